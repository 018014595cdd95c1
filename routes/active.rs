/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Active-route resolution.
//!
//! The tab session keys off the meta of the route currently rendered, so a
//! concrete pathname must be matched back to its `RouteMeta`. Route keys may
//! contain dynamic `:name` segments; matching substitutes the caller's
//! params first and tolerates a trailing slash. An unmatched path falls back
//! to the configured homepage.

use std::collections::BTreeMap;

use crate::model::RouteMeta;
use crate::routes::RouteNode;

/// A concrete route the shell is rendering: the matched meta plus the
/// parameter bindings that made it concrete.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRoute {
    pub meta: RouteMeta,
    pub params: BTreeMap<String, String>,
}

/// Outcome of resolving the active pathname.
#[derive(Debug, Clone, PartialEq)]
pub enum ActiveRoute {
    Matched(ResolvedRoute),
    /// No route matched; navigate to this path instead.
    Redirect(String),
}

/// Pre-order flattening of a route tree into its metas, synthetic index
/// children (empty keys) excluded.
pub fn flatten_route_metas(routes: &[RouteNode]) -> Vec<RouteMeta> {
    let mut out = Vec::new();
    collect_metas(routes, &mut out);
    out
}

fn collect_metas(routes: &[RouteNode], out: &mut Vec<RouteMeta>) {
    for route in routes {
        if !route.meta.key.is_empty() {
            out.push(route.meta.clone());
        }
        collect_metas(&route.children, out);
    }
}

/// Substitutes `:name` segments of a route key with values from `params`.
/// Segments without a binding are left verbatim.
pub fn resolve_params(key: &str, params: &BTreeMap<String, String>) -> String {
    key.split('/')
        .map(|segment| {
            segment
                .strip_prefix(':')
                .and_then(|name| params.get(name).map(String::as_str))
                .unwrap_or(segment)
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Matches `pathname` against the flattened metas, falling back to the
/// homepage when nothing matches.
pub fn resolve_active_route(
    pathname: &str,
    params: &BTreeMap<String, String>,
    metas: &[RouteMeta],
    homepage: &str,
) -> ActiveRoute {
    let matched = metas.iter().find(|meta| {
        let replaced = resolve_params(&meta.key, params);
        replaced == pathname || format!("{replaced}/") == pathname
    });
    match matched {
        Some(meta) => ActiveRoute::Matched(ResolvedRoute {
            meta: meta.clone(),
            params: params.clone(),
        }),
        None => ActiveRoute::Redirect(homepage.to_string()),
    }
}
