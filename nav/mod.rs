/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Menu visibility filtering.
//!
//! Derives the visible subset of the route tree for a user: authorization
//! codes gate gated nodes, an optional allowed-path set restricts to the
//! user's own permission tree, and empty groups collapse away. This stage
//! preserves sibling order; sorting happened in the route builder. None of
//! this is a security boundary — it is a UI convenience only.

use std::collections::HashSet;

use crate::routes::{PageBinding, RouteNode};

/// Filters a route tree down to the nodes the user may see.
///
/// A node is retained iff it declares no required code or the user holds at
/// least one of them, and no path restriction is in effect or its composed
/// path is allowed (the root path and synthetic index entries always pass).
/// A group with no surviving real children is removed. Applied bottom-up.
pub fn filter_routes(
    routes: &[RouteNode],
    codes: &HashSet<String>,
    allowed_paths: Option<&HashSet<String>>,
) -> Vec<RouteNode> {
    routes
        .iter()
        .filter_map(|route| filter_route(route, codes, allowed_paths))
        .collect()
}

fn filter_route(
    route: &RouteNode,
    codes: &HashSet<String>,
    allowed_paths: Option<&HashSet<String>>,
) -> Option<RouteNode> {
    if !authorized(route, codes) || !path_allowed(route, allowed_paths) {
        return None;
    }

    let children = filter_routes(&route.children, codes, allowed_paths);
    if matches!(route.binding, PageBinding::Group) {
        // A group survives only through its real children; the synthetic
        // index entry does not count.
        if !children.iter().any(|child| !child.index) {
            return None;
        }
    }

    let mut kept = route.clone();
    kept.children = children;
    Some(kept)
}

fn authorized(route: &RouteNode, codes: &HashSet<String>) -> bool {
    route.meta.auth.is_empty() || route.meta.auth.iter().any(|code| codes.contains(code))
}

fn path_allowed(route: &RouteNode, allowed_paths: Option<&HashSet<String>>) -> bool {
    let Some(allowed) = allowed_paths else {
        return true;
    };
    route.index || route.meta.key == "/" || allowed.contains(&route.meta.key)
}

/// A sidebar/search entry projected from the filtered route tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub path: String,
    pub title: String,
    pub children: Vec<NavItem>,
}

/// Projects a (filtered) route tree to navigation entries, dropping
/// `hide_menu` nodes and entries without a composed key.
pub fn nav_items(routes: &[RouteNode]) -> Vec<NavItem> {
    routes
        .iter()
        .filter(|route| !route.meta.key.is_empty() && !route.meta.hide_menu)
        .map(|route| NavItem {
            path: route.meta.key.clone(),
            title: route.meta.label.clone(),
            children: nav_items(&route.children),
        })
        .collect()
}
