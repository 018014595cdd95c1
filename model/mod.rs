/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Core data model: permission nodes as delivered by the backend, the derived
//! route metadata, and the persisted user session.
//!
//! Wire types use camelCase field names to match the backend payloads; the
//! derived types (`RouteMeta`) are never serialized.

use route_tree::TreeNode;
use serde::{Deserialize, Serialize};
use url::Url;

/// Discriminant for a permission/menu entry.
///
/// `Catalogue` is a grouping node, never a renderable page; `Menu` is a leaf
/// bound to an actual page. The backend encodes this as a bare number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum PermissionKind {
    Catalogue,
    Menu,
}

impl From<PermissionKind> for u8 {
    fn from(kind: PermissionKind) -> Self {
        match kind {
            PermissionKind::Catalogue => 0,
            PermissionKind::Menu => 1,
        }
    }
}

impl TryFrom<u8> for PermissionKind {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Catalogue),
            1 => Ok(Self::Menu),
            other => Err(format!("unknown permission kind: {other}")),
        }
    }
}

/// Enable/disable flag carried on permissions and user accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum BasicStatus {
    Disable,
    #[default]
    Enable,
}

impl From<BasicStatus> for u8 {
    fn from(status: BasicStatus) -> Self {
        match status {
            BasicStatus::Disable => 0,
            BasicStatus::Enable => 1,
        }
    }
}

impl TryFrom<u8> for BasicStatus {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Disable),
            1 => Ok(Self::Enable),
            other => Err(format!("unknown status: {other}")),
        }
    }
}

/// One permission/menu entry, in flat (parent-referencing) or nested form.
///
/// `name` doubles as the permission code used for menu gating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionNode {
    pub id: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    pub name: String,
    pub label: String,
    /// Path segment; empty for pure grouping nodes.
    #[serde(default)]
    pub route: String,
    #[serde(rename = "type")]
    pub kind: PermissionKind,
    #[serde(default)]
    pub order: Option<i64>,
    #[serde(default)]
    pub icon: Option<String>,
    /// Page path, only meaningful for `Menu` entries.
    #[serde(default)]
    pub component: Option<String>,
    /// Excluded from the menu but kept routable.
    #[serde(default)]
    pub hide: bool,
    /// Never materialized as a tab.
    #[serde(default)]
    pub hide_tab: bool,
    #[serde(default)]
    pub status: BasicStatus,
    /// External URL for iframe-hosted pages.
    #[serde(default)]
    pub frame_src: Option<String>,
    #[serde(default)]
    pub children: Vec<PermissionNode>,
}

impl PermissionNode {
    /// A grouping entry with no page binding.
    pub fn catalogue(id: &str, parent_id: Option<&str>, name: &str, label: &str, route: &str) -> Self {
        Self {
            id: id.to_string(),
            parent_id: parent_id.map(str::to_string),
            name: name.to_string(),
            label: label.to_string(),
            route: route.to_string(),
            kind: PermissionKind::Catalogue,
            order: None,
            icon: None,
            component: None,
            hide: false,
            hide_tab: false,
            status: BasicStatus::Enable,
            frame_src: None,
            children: Vec::new(),
        }
    }

    /// A leaf entry bound to a page implementation.
    pub fn menu(id: &str, parent_id: Option<&str>, name: &str, label: &str, route: &str, component: &str) -> Self {
        Self {
            component: Some(component.to_string()),
            kind: PermissionKind::Menu,
            ..Self::catalogue(id, parent_id, name, label, route)
        }
    }

    pub fn with_order(mut self, order: i64) -> Self {
        self.order = Some(order);
        self
    }
}

impl TreeNode for PermissionNode {
    fn id(&self) -> &str {
        &self.id
    }

    fn parent_id(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }

    fn segment(&self) -> &str {
        &self.route
    }

    fn children(&self) -> &[Self] {
        &self.children
    }

    fn with_children(&self, children: Vec<Self>) -> Self {
        let mut copy = self.clone();
        copy.children = children;
        copy
    }
}

/// Derived route metadata. One per permission node after transformation;
/// immutable once built for a given permission snapshot.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RouteMeta {
    /// Fully composed path from root to node. The route key.
    pub key: String,
    pub label: String,
    pub icon: Option<String>,
    pub hide_menu: bool,
    pub hide_tab: bool,
    pub disabled: bool,
    pub order: Option<i64>,
    /// Validated external URL for iframe-hosted pages.
    pub frame_src: Option<Url>,
    /// Authorization codes gating menu visibility; empty means no gate.
    /// Populated by static route modules, not by permission-derived routes
    /// (there, presence in the tree already implies the grant).
    pub auth: Vec<String>,
}

/// A role granted to the authenticated user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub id: String,
    pub name: String,
    /// Authorization code; mirrors `name` for backends that do not send a
    /// distinct code.
    pub code: String,
}

/// Access/refresh token pair. Both absent when unauthenticated.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserToken {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Profile of the authenticated user plus the flat permission list the route
/// builder consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: String,
    pub email: String,
    pub username: String,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub status: BasicStatus,
    #[serde(default)]
    pub permissions: Vec<PermissionNode>,
}

/// The single authoritative session record.
///
/// Persisted as one serialized snapshot; cleared wholesale on logout or on an
/// authentication failure signal from the transport layer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSession {
    #[serde(default)]
    pub user_info: Option<UserInfo>,
    #[serde(default)]
    pub user_token: UserToken,
}

impl UserSession {
    /// True when an access token is held. The protected-route gate.
    pub fn is_authenticated(&self) -> bool {
        self.user_token
            .access_token
            .as_deref()
            .is_some_and(|token| !token.is_empty())
    }

    pub fn permissions(&self) -> &[PermissionNode] {
        self.user_info
            .as_ref()
            .map(|info| info.permissions.as_slice())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_kind_round_trips_through_wire_numbers() {
        let json = serde_json::to_string(&PermissionKind::Menu).unwrap();
        assert_eq!(json, "1");
        let back: PermissionKind = serde_json::from_str("0").unwrap();
        assert_eq!(back, PermissionKind::Catalogue);
    }

    #[test]
    fn permission_kind_rejects_unknown_discriminant() {
        assert!(serde_json::from_str::<PermissionKind>("7").is_err());
    }

    #[test]
    fn permission_node_deserializes_camel_case_payload() {
        let json = r#"{
            "id": "9100",
            "parentId": "9000",
            "name": "workbench",
            "label": "Workbench",
            "route": "workbench",
            "type": 1,
            "component": "/dashboard/workbench/index",
            "hideTab": false,
            "frameSrc": null
        }"#;
        let node: PermissionNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.parent_id.as_deref(), Some("9000"));
        assert_eq!(node.kind, PermissionKind::Menu);
        assert_eq!(node.status, BasicStatus::Enable);
        assert!(node.children.is_empty());
    }

    #[test]
    fn empty_session_is_unauthenticated() {
        let session = UserSession::default();
        assert!(!session.is_authenticated());
        assert!(session.permissions().is_empty());
    }

    #[test]
    fn blank_access_token_is_not_authenticated() {
        let session = UserSession {
            user_token: UserToken {
                access_token: Some(String::new()),
                refresh_token: None,
            },
            ..UserSession::default()
        };
        assert!(!session.is_authenticated());
    }

    #[test]
    fn session_round_trips_through_json() {
        let session = UserSession {
            user_info: Some(UserInfo {
                id: "u1".to_string(),
                email: "admin@demo.com".to_string(),
                username: "Admin".to_string(),
                roles: vec![Role {
                    id: "role-1".to_string(),
                    name: "admin".to_string(),
                    code: "admin".to_string(),
                }],
                status: BasicStatus::Enable,
                permissions: vec![PermissionNode::catalogue(
                    "9000",
                    None,
                    "dashboard",
                    "Dashboard",
                    "dashboard",
                )],
            }),
            user_token: UserToken {
                access_token: Some("token-a".to_string()),
                refresh_token: Some("token-r".to_string()),
            },
        };
        let json = serde_json::to_string(&session).unwrap();
        let back: UserSession = serde_json::from_str(&json).unwrap();
        assert_eq!(session, back);
    }
}
