/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Static route registry for `module` mode.
//!
//! Each module contributes a pre-built subtree; the registry concatenates
//! them and sorts the top level by `order`. Deployments that do not derive
//! routes from backend permissions ship entirely from this table.

use crate::model::RouteMeta;
use crate::routes::{PageBinding, RouteNode};

/// The registered module builders, one per top-level menu group.
const MODULES: &[fn() -> RouteNode] = &[dashboard_module, management_module];

/// All module routes, top level sorted by `order` (missing order last).
pub fn module_routes() -> Vec<RouteNode> {
    let mut routes: Vec<RouteNode> = MODULES.iter().map(|build| build()).collect();
    routes.sort_by_key(|route| route.meta.order.unwrap_or(i64::MAX));
    routes
}

fn group_meta(key: &str, label: &str, icon: &str, order: i64) -> RouteMeta {
    RouteMeta {
        key: key.to_string(),
        label: label.to_string(),
        icon: Some(icon.to_string()),
        hide_tab: true,
        order: Some(order),
        ..RouteMeta::default()
    }
}

fn page_meta(key: &str, label: &str) -> RouteMeta {
    RouteMeta {
        key: key.to_string(),
        label: label.to_string(),
        ..RouteMeta::default()
    }
}

fn index_redirect(to: &str) -> RouteNode {
    RouteNode {
        meta: RouteMeta::default(),
        binding: PageBinding::Redirect { to: to.to_string() },
        index: true,
        children: Vec::new(),
    }
}

fn dashboard_module() -> RouteNode {
    RouteNode {
        meta: group_meta("/dashboard", "sys.menu.dashboard", "ic-analysis", 1),
        binding: PageBinding::Group,
        index: false,
        children: vec![
            index_redirect("workbench"),
            RouteNode::leaf(
                page_meta("/dashboard/workbench", "sys.menu.workbench"),
                PageBinding::Page {
                    page_id: "page:workbench",
                },
            ),
            RouteNode::leaf(
                page_meta("/dashboard/analysis", "sys.menu.analysis"),
                PageBinding::Page {
                    page_id: "page:analysis",
                },
            ),
        ],
    }
}

fn management_module() -> RouteNode {
    let mut meta = group_meta("/management", "sys.menu.management", "ic-management", 2);
    // Management screens are gated on the admin role code in module mode;
    // permission mode encodes the same gate by omitting the subtree.
    meta.auth = vec!["admin".to_string()];

    let system = RouteNode {
        meta: RouteMeta {
            key: "/management/system".to_string(),
            label: "sys.menu.system.index".to_string(),
            ..RouteMeta::default()
        },
        binding: PageBinding::Group,
        index: false,
        children: vec![
            index_redirect("user"),
            RouteNode::leaf(
                page_meta("/management/system/user", "sys.menu.system.user"),
                PageBinding::Page {
                    page_id: "page:system-user",
                },
            ),
            RouteNode::leaf(
                page_meta("/management/system/role", "sys.menu.system.role"),
                PageBinding::Page {
                    page_id: "page:system-role",
                },
            ),
            RouteNode::leaf(
                page_meta("/management/system/permission", "sys.menu.system.permission"),
                PageBinding::Page {
                    page_id: "page:system-permission",
                },
            ),
        ],
    };

    let user = RouteNode {
        meta: RouteMeta {
            key: "/management/user".to_string(),
            label: "sys.menu.user.index".to_string(),
            ..RouteMeta::default()
        },
        binding: PageBinding::Group,
        index: false,
        children: vec![
            index_redirect("profile"),
            RouteNode::leaf(
                page_meta("/management/user/profile", "sys.menu.user.profile"),
                PageBinding::Page {
                    page_id: "page:user-profile",
                },
            ),
        ],
    };

    RouteNode {
        meta,
        binding: PageBinding::Group,
        index: false,
        children: vec![index_redirect("user"), user, system],
    }
}
