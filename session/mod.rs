/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The single authoritative user session.
//!
//! One owned session object with an explicit subscribe/notify contract:
//! hydrated from the persisted snapshot at construction, mutated only through
//! the operations here, persisted synchronously with every mutation, and
//! cleared wholesale on logout or an authentication failure signal from the
//! transport layer.

use std::sync::{Arc, Weak};

use crossbeam_channel::{Receiver, Sender, unbounded};
use log::warn;
use parking_lot::{Mutex, RwLock};

use crate::model::{BasicStatus, PermissionNode, Role, UserInfo, UserSession, UserToken};
use crate::persistence::{SnapshotError, SnapshotStore};
use crate::services::auth::{
    AuthError, AuthLoginReq, AuthProvider, AuthRegisterReq, AuthRegisterRes, AuthUserProfile,
    TokenSource,
};

/// Notification sent to subscribers after a session mutation has been
/// applied and persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn,
    TokenRefreshed,
    SignedOut,
}

#[derive(Debug)]
pub enum SessionError {
    Auth(AuthError),
    Snapshot(SnapshotError),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::Auth(e) => write!(f, "{e}"),
            SessionError::Snapshot(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<AuthError> for SessionError {
    fn from(e: AuthError) -> Self {
        SessionError::Auth(e)
    }
}

/// Owns the session record, its persistence, and the auth provider that
/// mutates it.
pub struct SessionStore {
    provider: Box<dyn AuthProvider>,
    snapshot: SnapshotStore,
    session: RwLock<UserSession>,
    subscribers: Mutex<Vec<Sender<SessionEvent>>>,
}

impl SessionStore {
    /// Builds the store, hydrating from the persisted snapshot. A missing or
    /// undecodable snapshot yields the empty default.
    pub fn new(provider: Box<dyn AuthProvider>, snapshot: SnapshotStore) -> Self {
        let session = snapshot.load().unwrap_or_default();
        Self {
            provider,
            snapshot,
            session: RwLock::new(session),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Register a subscriber. Disconnected receivers are pruned on the next
    /// notification.
    pub fn subscribe(&self) -> Receiver<SessionEvent> {
        let (tx, rx) = unbounded();
        self.subscribers.lock().push(tx);
        rx
    }

    /// Exchange credentials for a full session. On success the entire
    /// session is replaced and persisted; on failure it is left unchanged.
    pub fn login(&self, req: &AuthLoginReq) -> Result<(), SessionError> {
        let res = self.provider.login(req)?;
        let next = UserSession {
            user_info: Some(map_profile(res.user)),
            user_token: UserToken {
                access_token: Some(res.access_token),
                refresh_token: Some(res.refresh_token),
            },
        };
        self.commit(next, SessionEvent::SignedIn);
        Ok(())
    }

    /// Pass-through to the auth provider; registration does not touch the
    /// session.
    pub fn register(&self, req: &AuthRegisterReq) -> Result<AuthRegisterRes, SessionError> {
        Ok(self.provider.register(req)?)
    }

    /// Exchange the held refresh token for a fresh token pair. A missing or
    /// rejected refresh token clears the session (refresh-driven 401); a
    /// transport failure leaves it untouched.
    pub fn refresh_token(&self) -> Result<(), SessionError> {
        let held = self.session.read().user_token.refresh_token.clone();
        let Some(token) = held.filter(|t| !t.is_empty()) else {
            self.clear_session();
            return Err(SessionError::Auth(AuthError::Unauthorized(
                "No refresh token held.".to_string(),
            )));
        };
        match self.provider.refresh_token(&token) {
            Ok(res) => {
                let mut next = self.session.read().clone();
                next.user_token = UserToken {
                    access_token: Some(res.access_token),
                    refresh_token: Some(res.refresh_token),
                };
                self.commit(next, SessionEvent::TokenRefreshed);
                Ok(())
            },
            Err(e @ AuthError::Unauthorized(_)) => {
                self.clear_session();
                Err(SessionError::Auth(e))
            },
            Err(e) => Err(SessionError::Auth(e)),
        }
    }

    /// Clear the session to its empty default. Idempotent.
    pub fn logout(&self) {
        self.clear_session();
    }

    /// The 401 signal from the transport layer.
    pub fn handle_unauthorized(&self) {
        self.clear_session();
    }

    /// The currently held flat permission list; empty when unauthenticated.
    pub fn permissions(&self) -> Vec<PermissionNode> {
        self.session.read().permissions().to_vec()
    }

    pub fn user_info(&self) -> Option<UserInfo> {
        self.session.read().user_info.clone()
    }

    pub fn token(&self) -> UserToken {
        self.session.read().user_token.clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.session.read().user_token.access_token.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.read().is_authenticated()
    }

    /// Full session copy, for snapshot inspection.
    pub fn current(&self) -> UserSession {
        self.session.read().clone()
    }

    /// Bearer token source for HTTP clients. Holds only a weak reference so
    /// a client outliving the store simply stops producing tokens.
    pub fn token_source(self: &Arc<Self>) -> TokenSource {
        let store: Weak<SessionStore> = Arc::downgrade(self);
        Arc::new(move || store.upgrade().and_then(|s| s.access_token()))
    }

    /// Apply and persist a mutation, then notify subscribers. The write lock
    /// is held across the snapshot write so readers never observe a session
    /// that is ahead of durable storage.
    fn commit(&self, next: UserSession, event: SessionEvent) {
        {
            let mut guard = self.session.write();
            *guard = next;
            if let Err(e) = self.snapshot.save(&guard) {
                warn!("Failed to persist session snapshot: {e}");
            }
        }
        self.notify(event);
    }

    fn clear_session(&self) {
        {
            let mut guard = self.session.write();
            *guard = UserSession::default();
            if let Err(e) = self.snapshot.clear() {
                warn!("Failed to clear session snapshot: {e}");
            }
        }
        self.notify(SessionEvent::SignedOut);
    }

    fn notify(&self, event: SessionEvent) {
        self.subscribers
            .lock()
            .retain(|tx| tx.send(event).is_ok());
    }
}

/// Maps the backend profile onto the session's `UserInfo`, choosing the best
/// available username spelling.
fn map_profile(profile: AuthUserProfile) -> UserInfo {
    let permissions = profile.permission_source();
    let username = profile
        .display_name
        .clone()
        .or_else(|| {
            let joined = [profile.first_name.as_deref(), profile.last_name.as_deref()]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(" ");
            (!joined.is_empty()).then_some(joined)
        })
        .unwrap_or_else(|| profile.email.clone());
    UserInfo {
        id: profile.id,
        email: profile.email,
        username,
        roles: profile
            .roles
            .into_iter()
            .map(|role| Role {
                id: role.id,
                code: role.name.clone(),
                name: role.name,
            })
            .collect(),
        status: if profile.is_active {
            BasicStatus::Enable
        } else {
            BasicStatus::Disable
        },
        permissions,
    }
}
