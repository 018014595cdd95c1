/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Startup preferences.
//!
//! Loaded once from a TOML file and treated as immutable for the lifetime of
//! the process; in particular the route mode is never re-branched per
//! request. A missing file yields the defaults; a malformed file is an error
//! surfaced to the caller.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Strategy for producing the route tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteMode {
    /// Route definitions come from the static module registry.
    Module,
    /// Routes are derived from the authenticated session's permission list.
    #[default]
    Permission,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppPreferences {
    pub route_mode: RouteMode,
    /// Fallback destination when the active path matches no route.
    pub homepage: String,
    /// Session snapshot directory; `None` selects the platform default.
    pub data_dir: Option<PathBuf>,
}

impl Default for AppPreferences {
    fn default() -> Self {
        Self {
            route_mode: RouteMode::Permission,
            homepage: "/dashboard/workbench".to_string(),
            data_dir: None,
        }
    }
}

impl AppPreferences {
    /// Reads preferences from `path`. A missing file is not an error.
    pub fn load(path: &Path) -> Result<Self, PrefsError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            },
            Err(e) => return Err(PrefsError::Io(format!("{e}"))),
        };
        toml::from_str(&raw).map_err(|e| PrefsError::Parse(format!("{e}")))
    }
}

#[derive(Debug)]
pub enum PrefsError {
    Io(String),
    Parse(String),
}

impl std::fmt::Display for PrefsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrefsError::Io(e) => write!(f, "Preferences IO error: {e}"),
            PrefsError::Parse(e) => write!(f, "Preferences parse error: {e}"),
        }
    }
}

impl std::error::Error for PrefsError {}
