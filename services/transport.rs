/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Response envelope shared by all backend endpoints.
//!
//! Every payload arrives wrapped as `{status, message, data}`. Status `0` is
//! the application-level success code; `200` and `201` cover backends that
//! echo the HTTP status instead. Anything else is a failure carrying
//! `message` as the error text.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::services::auth::AuthError;

/// Fallback error text when the backend sends no message.
pub const GENERIC_REQUEST_FAILED: &str = "Request failed";

const STATUS_SUCCESS: i64 = 0;
const HTTP_OK: i64 = 200;
const HTTP_CREATED: i64 = 201;

#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    pub status: i64,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl Envelope {
    pub fn is_success(&self) -> bool {
        matches!(self.status, STATUS_SUCCESS | HTTP_OK | HTTP_CREATED)
    }
}

/// Unwraps an envelope into its typed payload, or the carried failure
/// message.
pub fn unwrap_envelope<T: DeserializeOwned>(envelope: Envelope) -> Result<T, AuthError> {
    if !envelope.is_success() {
        let message = envelope
            .message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| GENERIC_REQUEST_FAILED.to_string());
        return Err(AuthError::Api(message));
    }
    serde_json::from_value(envelope.data)
        .map_err(|e| AuthError::Transport(format!("Malformed response payload: {e}")))
}
