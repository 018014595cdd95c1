/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Auth service contract and its two implementations: the HTTP client used
//! against a real backend and an in-memory provider mirroring the demo mock
//! server (fixed credentials, canned tokens).

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::model::PermissionNode;
use crate::services::transport::{Envelope, GENERIC_REQUEST_FAILED, unwrap_envelope};

const LOGIN_PATH: &str = "/auth/login";
const REGISTER_PATH: &str = "/auth/register";
const REFRESH_TOKEN_PATH: &str = "/auth/refresh-token";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(50);

#[derive(Debug, Clone, Serialize)]
pub struct AuthLoginReq {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthRegisterReq {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthRoleInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// User profile in the login response. Backends disagree on where the
/// permission tree lives; all three spellings are accepted.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUserProfile {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub roles: Vec<AuthRoleInfo>,
    #[serde(default)]
    pub permission_tree: Option<Vec<PermissionNode>>,
    #[serde(default)]
    pub permissions: Option<Vec<PermissionNode>>,
    #[serde(default)]
    pub menu: Option<Vec<PermissionNode>>,
}

impl AuthUserProfile {
    /// The permission source actually present on this profile, first spelling
    /// that is populated winning.
    pub fn permission_source(&self) -> Vec<PermissionNode> {
        self.permission_tree
            .clone()
            .or_else(|| self.permissions.clone())
            .or_else(|| self.menu.clone())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthLoginRes {
    pub user: AuthUserProfile,
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthRefreshRes {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthRegisterRes {
    pub message: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub requires_verification: bool,
}

/// Errors from the auth service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The credentials or refresh token were rejected.
    Unauthorized(String),
    /// The backend answered with a failure-status envelope.
    Api(String),
    /// The request never produced a usable envelope.
    Transport(String),
}

impl AuthError {
    /// Human-readable text shown to the user.
    pub fn message(&self) -> &str {
        match self {
            AuthError::Unauthorized(m) | AuthError::Api(m) | AuthError::Transport(m) => m,
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for AuthError {}

/// The auth service as the session store consumes it.
pub trait AuthProvider: Send + Sync {
    fn login(&self, req: &AuthLoginReq) -> Result<AuthLoginRes, AuthError>;
    fn register(&self, req: &AuthRegisterReq) -> Result<AuthRegisterRes, AuthError>;
    fn refresh_token(&self, refresh_token: &str) -> Result<AuthRefreshRes, AuthError>;
}

/// Source of the bearer token attached to outgoing requests.
pub type TokenSource = Arc<dyn Fn() -> Option<String> + Send + Sync>;

/// Blocking HTTP implementation of [`AuthProvider`].
pub struct HttpAuthClient {
    base_url: String,
    client: reqwest::blocking::Client,
    token_source: Option<TokenSource>,
}

impl HttpAuthClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, AuthError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AuthError::Transport(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            token_source: None,
        })
    }

    /// Attach a bearer token source consulted on every request.
    pub fn with_token_source(mut self, source: TokenSource) -> Self {
        self.token_source = Some(source);
        self
    }

    fn post<T, B>(&self, path: &str, body: &B) -> Result<T, AuthError>
    where
        T: serde::de::DeserializeOwned,
        B: Serialize,
    {
        let mut request = self
            .client
            .post(format!("{}{path}", self.base_url))
            .json(body);
        if let Some(source) = &self.token_source
            && let Some(token) = source()
        {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .map_err(|e| AuthError::Transport(format!("{e}")))?;

        let http_status = response.status();
        let envelope: Envelope = response.json().map_err(|_| {
            AuthError::Transport(GENERIC_REQUEST_FAILED.to_string())
        })?;

        if http_status == reqwest::StatusCode::UNAUTHORIZED {
            let message = envelope
                .message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| "Unauthorized".to_string());
            return Err(AuthError::Unauthorized(message));
        }
        unwrap_envelope(envelope)
    }
}

impl AuthProvider for HttpAuthClient {
    fn login(&self, req: &AuthLoginReq) -> Result<AuthLoginRes, AuthError> {
        self.post(LOGIN_PATH, req)
    }

    fn register(&self, req: &AuthRegisterReq) -> Result<AuthRegisterRes, AuthError> {
        self.post(REGISTER_PATH, req)
    }

    fn refresh_token(&self, refresh_token: &str) -> Result<AuthRefreshRes, AuthError> {
        self.post(
            REFRESH_TOKEN_PATH,
            &serde_json::json!({ "refreshToken": refresh_token }),
        )
    }
}

/// In-memory [`AuthProvider`] mirroring the demo mock server: one fixed
/// credential pair, sequential canned tokens, a configurable permission tree.
pub struct MockAuthProvider {
    email: String,
    password: String,
    permission_tree: Vec<PermissionNode>,
    token_counter: AtomicU64,
}

impl MockAuthProvider {
    pub const DEMO_EMAIL: &'static str = "admin@demo.com";
    pub const DEMO_PASSWORD: &'static str = "demo1234";

    pub fn new(email: &str, password: &str, permission_tree: Vec<PermissionNode>) -> Self {
        Self {
            email: email.to_string(),
            password: password.to_string(),
            permission_tree,
            token_counter: AtomicU64::new(0),
        }
    }

    pub fn demo(permission_tree: Vec<PermissionNode>) -> Self {
        Self::new(Self::DEMO_EMAIL, Self::DEMO_PASSWORD, permission_tree)
    }

    fn next_token(&self, kind: &str) -> String {
        let serial = self.token_counter.fetch_add(1, Ordering::Relaxed);
        format!("mock-{kind}-{serial}")
    }
}

impl AuthProvider for MockAuthProvider {
    fn login(&self, req: &AuthLoginReq) -> Result<AuthLoginRes, AuthError> {
        if req.email != self.email || req.password != self.password {
            return Err(AuthError::Unauthorized(
                "Invalid email or password.".to_string(),
            ));
        }
        Ok(AuthLoginRes {
            user: AuthUserProfile {
                id: "mock-user".to_string(),
                email: self.email.clone(),
                first_name: Some("Admin".to_string()),
                last_name: Some("User".to_string()),
                display_name: Some("Admin".to_string()),
                is_active: true,
                roles: vec![AuthRoleInfo {
                    id: "role-1".to_string(),
                    name: "admin".to_string(),
                    description: Some("Administrator".to_string()),
                }],
                permission_tree: Some(self.permission_tree.clone()),
                permissions: None,
                menu: None,
            },
            access_token: self.next_token("access"),
            refresh_token: self.next_token("refresh"),
            expires_in: 900,
        })
    }

    fn register(&self, _req: &AuthRegisterReq) -> Result<AuthRegisterRes, AuthError> {
        Ok(AuthRegisterRes {
            message: "Registration successful. Please verify your email.".to_string(),
            email: String::new(),
            requires_verification: true,
        })
    }

    fn refresh_token(&self, refresh_token: &str) -> Result<AuthRefreshRes, AuthError> {
        if refresh_token.is_empty() {
            return Err(AuthError::Unauthorized(
                "Refresh token required.".to_string(),
            ));
        }
        Ok(AuthRefreshRes {
            access_token: self.next_token("access"),
            refresh_token: self.next_token("refresh"),
        })
    }
}
