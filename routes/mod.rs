/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Route tree construction.
//!
//! Two operating modes produce the same shape: `module` mode reads the static
//! registry in [`modules`], `permission` mode transforms the authenticated
//! session's permission list. The mode is a startup preference, never
//! re-branched per request.

pub mod active;
pub mod modules;
mod permission;

pub use active::{ActiveRoute, ResolvedRoute, flatten_route_metas, resolve_active_route, resolve_params};
pub use permission::build_permission_routes;

use url::Url;

use crate::model::{PermissionNode, RouteMeta};
use crate::prefs::RouteMode;
use crate::registries::PageRegistry;

/// What a route node renders, switched on by the host shell.
#[derive(Debug, Clone, PartialEq)]
pub enum PageBinding {
    /// Catalogue pass-through; children render in its place.
    Group,
    /// Synthetic index entry redirecting to a sibling-relative segment.
    Redirect { to: String },
    /// A resolved page implementation.
    Page { page_id: &'static str },
    /// A resolved page hosting an external document.
    Frame { page_id: &'static str, src: Url },
    /// Renders nothing; the degradation target for unresolved components.
    Empty,
}

/// One node of the route tree, carrying its derived metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteNode {
    pub meta: RouteMeta,
    pub binding: PageBinding,
    /// True for the synthetic index child of a catalogue.
    pub index: bool,
    pub children: Vec<RouteNode>,
}

impl RouteNode {
    pub fn leaf(meta: RouteMeta, binding: PageBinding) -> Self {
        Self {
            meta,
            binding,
            index: false,
            children: Vec::new(),
        }
    }
}

/// Produces the route tree for the configured mode.
pub fn build_routes(
    mode: RouteMode,
    permissions: &[PermissionNode],
    registry: &PageRegistry,
) -> Vec<RouteNode> {
    match mode {
        RouteMode::Module => modules::module_routes(),
        RouteMode::Permission => build_permission_routes(permissions, registry),
    }
}
