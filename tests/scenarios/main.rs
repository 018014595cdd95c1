/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Cross-module scenarios: login through route building, navigation
//! filtering, active-route resolution, and the tab session.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use adminshell::model::PermissionNode;
use adminshell::nav::{filter_routes, nav_items};
use adminshell::persistence::SnapshotStore;
use adminshell::prefs::{AppPreferences, RouteMode};
use adminshell::registries::PageRegistry;
use adminshell::routes::{
    ActiveRoute, build_routes, flatten_route_metas, resolve_active_route,
};
use adminshell::services::auth::{AuthLoginReq, MockAuthProvider};
use adminshell::session::{SessionEvent, SessionStore};
use adminshell::tabs::TabSession;
use tempfile::TempDir;

#[test]
fn version_smoke() {
    assert!(!adminshell::VERSION.is_empty());
}

/// Flat permission list in the shape the demo backend returns.
fn demo_permissions() -> Vec<PermissionNode> {
    let mut hidden_detail = PermissionNode::menu(
        "9330",
        Some("9300"),
        "user-detail",
        "User Detail",
        "user-detail",
        "/management/system/user",
    );
    hidden_detail.hide = true;

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
        PermissionNode::catalogue("9300", None, "management", "Management", "management")
            .with_order(2),
        PermissionNode::menu(
            "9310",
            Some("9300"),
            "system-user",
            "Users",
            "system/user",
            "/management/system/user",
        )
        .with_order(1),
        PermissionNode::menu(
            "9320",
            Some("9300"),
            "system-role",
            "Roles",
            "system/role",
            "/management/system/role",
        )
        .with_order(2),
        hidden_detail,
    ]
}

fn login_req() -> AuthLoginReq {
    AuthLoginReq {
        email: MockAuthProvider::DEMO_EMAIL.to_string(),
        password: MockAuthProvider::DEMO_PASSWORD.to_string(),
    }
}

fn store_in(dir: &TempDir) -> SessionStore {
    let snapshot = SnapshotStore::open(dir.path().to_path_buf()).unwrap();
    SessionStore::new(
        Box::new(MockAuthProvider::demo(demo_permissions())),
        snapshot,
    )
}

#[test]
fn login_to_tabs_full_pipeline() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(store_in(&dir));
    let events = store.subscribe();

    store.login(&login_req()).unwrap();
    assert_eq!(events.try_recv(), Ok(SessionEvent::SignedIn));

    // Route tree from the session's permission list.
    let prefs = AppPreferences::default();
    let registry = PageRegistry::core_seed();
    let routes = build_routes(prefs.route_mode, &store.permissions(), &registry);
    assert_eq!(routes.len(), 2);
    assert_eq!(routes[0].meta.key, "/dashboard");
    assert_eq!(routes[1].meta.key, "/management");

    // Sidebar projection hides the hide-menu detail page.
    let visible = filter_routes(&routes, &HashSet::new(), None);
    let items = nav_items(&visible);
    let management_children: Vec<&str> = items[1]
        .children
        .iter()
        .map(|item| item.path.as_str())
        .collect();
    assert_eq!(
        management_children,
        vec!["/management/system/user", "/management/system/role"]
    );

    // Navigate through resolved routes; tabs mirror the visits.
    let metas = flatten_route_metas(&routes);
    let mut tabs = TabSession::new();
    for path in ["/dashboard/workbench", "/dashboard/analysis"] {
        match resolve_active_route(path, &BTreeMap::new(), &metas, &prefs.homepage) {
            ActiveRoute::Matched(route) => tabs.sync_active_route(&route),
            other => panic!("expected {path} to match, got {other:?}"),
        }
    }
    let keys: Vec<&str> = tabs.tabs().iter().map(|tab| tab.key.as_str()).collect();
    assert_eq!(keys, vec!["/dashboard/workbench", "/dashboard/analysis"]);

    // Group paths never materialize as tabs.
    match resolve_active_route("/dashboard", &BTreeMap::new(), &metas, &prefs.homepage) {
        ActiveRoute::Matched(route) => tabs.sync_active_route(&route),
        other => panic!("expected group match, got {other:?}"),
    }
    assert_eq!(tabs.tabs().len(), 2);

    // Closing the active tab falls back to a still-open neighbor.
    let outcome = tabs.close("/dashboard/analysis", "/dashboard/analysis");
    assert_eq!(outcome.fallback.as_deref(), Some("/dashboard/workbench"));
}

#[test]
fn unknown_path_redirects_to_homepage() {
    let prefs = AppPreferences::default();
    let registry = PageRegistry::core_seed();
    let routes = build_routes(RouteMode::Permission, &demo_permissions(), &registry);
    let metas = flatten_route_metas(&routes);
    let resolved = resolve_active_route("/nope", &BTreeMap::new(), &metas, &prefs.homepage);
    assert_eq!(resolved, ActiveRoute::Redirect(prefs.homepage.clone()));
}

#[test]
fn failed_login_persists_nothing_across_restart() {
    let dir = TempDir::new().unwrap();
    {
        let store = store_in(&dir);
        let result = store.login(&AuthLoginReq {
            email: MockAuthProvider::DEMO_EMAIL.to_string(),
            password: "wrong".to_string(),
        });
        assert!(result.is_err());
        assert!(!store.is_authenticated());
    }
    let revived = store_in(&dir);
    assert!(!revived.is_authenticated());
    assert!(revived.permissions().is_empty());
}

#[test]
fn session_survives_restart_until_logout() {
    let dir = TempDir::new().unwrap();
    {
        let store = store_in(&dir);
        store.login(&login_req()).unwrap();
    }
    {
        let revived = store_in(&dir);
        assert!(revived.is_authenticated());
        assert_eq!(revived.permissions().len(), demo_permissions().len());
        revived.logout();
    }
    let after_logout = store_in(&dir);
    assert!(!after_logout.is_authenticated());
}

#[test]
fn module_mode_gates_management_behind_role_codes() {
    let registry = PageRegistry::core_seed();
    let routes = build_routes(RouteMode::Module, &[], &registry);

    let nobody = filter_routes(&routes, &HashSet::new(), None);
    assert!(nobody.iter().all(|route| route.meta.key != "/management"));

    let admin: HashSet<String> = ["admin".to_string()].into_iter().collect();
    let admin_view = filter_routes(&routes, &admin, None);
    assert!(admin_view.iter().any(|route| route.meta.key == "/management"));
}
