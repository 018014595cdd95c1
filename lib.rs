/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Adminshell: session core of a role-based admin dashboard shell.
//!
//! The pipeline: the session store holds the authenticated user's flat
//! permission list; the route builder turns that list into a route tree with
//! composed paths and page bindings; the navigation filter derives the
//! visible menu subset; and the tab session mirrors visited routes as an
//! ordered tab list. Everything degrades rather than fails: dangling parent
//! references, unresolved components, and corrupt snapshots are logged and
//! worked around, never fatal.

pub mod model;
pub mod nav;
pub mod persistence;
pub mod prefs;
pub mod registries;
pub mod routes;
pub mod services;
pub mod session;
pub mod tabs;

pub use model::{
    BasicStatus, PermissionKind, PermissionNode, RouteMeta, UserInfo, UserSession, UserToken,
};
pub use nav::{NavItem, filter_routes, nav_items};
pub use persistence::SnapshotStore;
pub use prefs::{AppPreferences, RouteMode};
pub use registries::PageRegistry;
pub use routes::{
    ActiveRoute, PageBinding, ResolvedRoute, RouteNode, build_routes, flatten_route_metas,
    resolve_active_route,
};
pub use session::{SessionEvent, SessionStore};
pub use tabs::{Tab, TabSession};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
