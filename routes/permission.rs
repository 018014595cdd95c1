/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Permission-list to route-tree transformation.
//!
//! The flat list is treated as an arena: an id index is built once per
//! snapshot, full paths are derived through it, and fresh route nodes are
//! produced without mutating the source records. No degradation here is
//! fatal; the tree build always completes.

use log::{error, warn};
use route_tree::NodeIndex;
use url::Url;

use crate::model::{BasicStatus, PermissionKind, PermissionNode, RouteMeta};
use crate::registries::PageRegistry;
use crate::routes::{PageBinding, RouteNode};

/// Transforms a permission list (flat or pre-nested) into the route tree.
pub fn build_permission_routes(
    permissions: &[PermissionNode],
    registry: &PageRegistry,
) -> Vec<RouteNode> {
    if permissions.is_empty() {
        return Vec::new();
    }

    // A flat list carries no nesting; rebuild the hierarchy first. Pre-nested
    // input flattens into the same arena either way.
    let nested = if permissions.iter().any(|p| !p.children.is_empty()) {
        permissions.to_vec()
    } else {
        route_tree::rebuild(permissions)
    };
    let flat = route_tree::flatten(&nested);
    let index = NodeIndex::new(&flat);

    transform(&nested, &index, registry)
}

fn transform(
    nodes: &[PermissionNode],
    index: &NodeIndex<'_, PermissionNode>,
    registry: &PageRegistry,
) -> Vec<RouteNode> {
    ordered(nodes)
        .into_iter()
        .map(|node| match node.kind {
            PermissionKind::Catalogue => catalogue_route(node, index, registry),
            PermissionKind::Menu => menu_route(node, index, registry),
        })
        .collect()
}

/// Sibling order: `order` ascending, ties broken by input order, missing
/// `order` last. Stable sort carries the tie-break.
fn ordered(nodes: &[PermissionNode]) -> Vec<&PermissionNode> {
    let mut out: Vec<&PermissionNode> = nodes.iter().collect();
    out.sort_by_key(|node| node.order.unwrap_or(i64::MAX));
    out
}

fn catalogue_route(
    node: &PermissionNode,
    index: &NodeIndex<'_, PermissionNode>,
    registry: &PageRegistry,
) -> RouteNode {
    let mut meta = base_meta(node, index);
    // Grouping nodes never materialize as tabs.
    meta.hide_tab = true;

    let ordered_children = ordered(&node.children);
    let mut children = transform(&node.children, index, registry);
    if let Some(first) = ordered_children.first() {
        // Deterministic default page per group.
        children.insert(
            0,
            RouteNode {
                meta: RouteMeta::default(),
                binding: PageBinding::Redirect {
                    to: first.route.clone(),
                },
                index: true,
                children: Vec::new(),
            },
        );
    }

    RouteNode {
        meta,
        binding: PageBinding::Group,
        index: false,
        children,
    }
}

fn menu_route(
    node: &PermissionNode,
    index: &NodeIndex<'_, PermissionNode>,
    registry: &PageRegistry,
) -> RouteNode {
    let mut meta = base_meta(node, index);
    let binding = match node.component.as_deref() {
        Some(component) => {
            let selection = registry.resolve(component);
            if selection.fallback_used {
                error!("Component not found for path: {component}");
                PageBinding::Empty
            } else {
                match node.frame_src.as_deref() {
                    Some(raw) => match Url::parse(raw) {
                        Ok(src) => {
                            meta.frame_src = Some(src.clone());
                            PageBinding::Frame {
                                page_id: selection.page_id,
                                src,
                            }
                        },
                        Err(e) => {
                            warn!("Invalid frame source '{raw}': {e}");
                            PageBinding::Empty
                        },
                    },
                    None => PageBinding::Page {
                        page_id: selection.page_id,
                    },
                }
            }
        },
        None => PageBinding::Empty,
    };
    RouteNode::leaf(meta, binding)
}

fn base_meta(node: &PermissionNode, index: &NodeIndex<'_, PermissionNode>) -> RouteMeta {
    let full = route_tree::full_path(node, index);
    if full.truncated {
        warn!(
            "Parent permission not found for id: {}",
            node.parent_id.as_deref().unwrap_or("<none>")
        );
    }
    RouteMeta {
        key: full.path,
        label: node.label.clone(),
        icon: node.icon.clone(),
        hide_menu: node.hide,
        hide_tab: node.hide_tab,
        disabled: node.status == BasicStatus::Disable,
        order: node.order,
        frame_src: None,
        auth: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PermissionNode;
    use crate::registries::{PageRegistry, PageSelection};
    use route_tree::TreeNode;

    fn demo_flat() -> Vec<PermissionNode> {
        vec![
            PermissionNode::catalogue("9000", None, "dashboard", "Dashboard", "dashboard")
                .with_order(1),
            PermissionNode::menu(
                "9100",
                Some("9000"),
                "workbench",
                "Workbench",
                "workbench",
                "/dashboard/workbench",
            )
            .with_order(1),
            PermissionNode::menu(
                "9200",
                Some("9000"),
                "analysis",
                "Analysis",
                "analysis",
                "/dashboard/analysis",
            )
            .with_order(2),
        ]
    }

    #[test]
    fn flat_list_is_rebuilt_and_paths_composed() {
        let registry = PageRegistry::core_seed();
        let routes = build_permission_routes(&demo_flat(), &registry);
        assert_eq!(routes.len(), 1);
        let dashboard = &routes[0];
        assert_eq!(dashboard.meta.key, "/dashboard");
        assert!(dashboard.meta.hide_tab);
        // Index redirect plus two menu children.
        assert_eq!(dashboard.children.len(), 3);
        assert_eq!(dashboard.children[1].meta.key, "/dashboard/workbench");
        assert_eq!(dashboard.children[2].meta.key, "/dashboard/analysis");
    }

    #[test]
    fn catalogue_gains_index_redirect_to_first_child() {
        let registry = PageRegistry::core_seed();
        let routes = build_permission_routes(&demo_flat(), &registry);
        let first = &routes[0].children[0];
        assert!(first.index);
        assert_eq!(
            first.binding,
            PageBinding::Redirect {
                to: "workbench".to_string()
            }
        );
    }

    #[test]
    fn childless_catalogue_gets_no_index_redirect() {
        let registry = PageRegistry::core_seed();
        let routes = build_permission_routes(
            &[PermissionNode::catalogue("1", None, "empty", "Empty", "empty")],
            &registry,
        );
        assert!(routes[0].children.is_empty());
        assert_eq!(routes[0].binding, PageBinding::Group);
    }

    #[test]
    fn siblings_sort_by_order_with_missing_order_last() {
        let registry = PageRegistry::core_seed();
        let flat = vec![
            PermissionNode::menu("1", None, "c", "C", "c", "/dashboard/workbench"),
            PermissionNode::menu("2", None, "a", "A", "a", "/dashboard/workbench").with_order(2),
            PermissionNode::menu("3", None, "b", "B", "b", "/dashboard/workbench").with_order(1),
        ];
        let routes = build_permission_routes(&flat, &registry);
        let keys: Vec<&str> = routes.iter().map(|r| r.meta.key.as_str()).collect();
        assert_eq!(keys, vec!["/b", "/a", "/c"]);
    }

    #[test]
    fn order_ties_keep_input_order() {
        let registry = PageRegistry::core_seed();
        let flat = vec![
            PermissionNode::menu("1", None, "x", "X", "x", "/dashboard/workbench").with_order(5),
            PermissionNode::menu("2", None, "y", "Y", "y", "/dashboard/workbench").with_order(5),
        ];
        let routes = build_permission_routes(&flat, &registry);
        let keys: Vec<&str> = routes.iter().map(|r| r.meta.key.as_str()).collect();
        assert_eq!(keys, vec!["/x", "/y"]);
    }

    #[test]
    fn unresolved_component_degrades_to_empty_binding() {
        let registry = PageRegistry::core_seed();
        let flat = vec![PermissionNode::menu(
            "1",
            None,
            "ghost",
            "Ghost",
            "ghost",
            "/no/such/component",
        )];
        let routes = build_permission_routes(&flat, &registry);
        assert_eq!(routes[0].binding, PageBinding::Empty);
        assert_eq!(routes[0].meta.key, "/ghost");
    }

    #[test]
    fn dangling_parent_truncates_path_but_emits_node() {
        let registry = PageRegistry::core_seed();
        let flat = vec![PermissionNode::menu(
            "2",
            Some("missing"),
            "workbench",
            "Workbench",
            "workbench",
            "/dashboard/workbench",
        )];
        let routes = build_permission_routes(&flat, &registry);
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].meta.key, "/workbench");
    }

    #[test]
    fn frame_source_binds_iframe_page() {
        let registry = PageRegistry::core_seed();
        let mut node = PermissionNode::menu(
            "1",
            None,
            "frame",
            "Frame",
            "frame",
            "/sys/others/iframe",
        );
        node.frame_src = Some("https://ant.design/index-cn".to_string());
        let routes = build_permission_routes(&[node], &registry);
        match &routes[0].binding {
            PageBinding::Frame { page_id, src } => {
                assert_eq!(*page_id, "page:frame");
                assert_eq!(src.as_str(), "https://ant.design/index-cn");
            },
            other => panic!("expected Frame binding, got {other:?}"),
        }
        assert!(routes[0].meta.frame_src.is_some());
    }

    #[test]
    fn invalid_frame_source_degrades_to_empty() {
        let registry = PageRegistry::core_seed();
        let mut node = PermissionNode::menu(
            "1",
            None,
            "frame",
            "Frame",
            "frame",
            "/sys/others/iframe",
        );
        node.frame_src = Some("not a url".to_string());
        let routes = build_permission_routes(&[node], &registry);
        assert_eq!(routes[0].binding, PageBinding::Empty);
    }

    #[test]
    fn disabled_permission_marks_meta_disabled() {
        let registry = PageRegistry::core_seed();
        let mut node = PermissionNode::menu(
            "1",
            None,
            "workbench",
            "Workbench",
            "workbench",
            "/dashboard/workbench",
        );
        node.status = BasicStatus::Disable;
        let routes = build_permission_routes(&[node], &registry);
        assert!(routes[0].meta.disabled);
    }

    #[test]
    fn pre_nested_input_is_accepted() {
        let registry = PageRegistry::core_seed();
        let tree = vec![PermissionNode::catalogue(
            "9000",
            None,
            "dashboard",
            "Dashboard",
            "dashboard",
        )
        .with_children(vec![PermissionNode::menu(
            "9100",
            Some("9000"),
            "workbench",
            "Workbench",
            "workbench",
            "/dashboard/workbench",
        )])];
        let routes = build_permission_routes(&tree, &registry);
        assert_eq!(routes[0].children.len(), 2);
        assert_eq!(routes[0].children[1].meta.key, "/dashboard/workbench");
    }

    #[test]
    fn resolved_component_is_a_registry_page() {
        let registry = PageRegistry::core_seed();
        assert_eq!(
            registry.resolve("/dashboard/workbench"),
            PageSelection {
                page_id: "page:workbench",
                fallback_used: false,
                matched_by: "verbatim",
            }
        );
    }
}
