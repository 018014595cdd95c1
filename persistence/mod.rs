/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Session snapshot persistence using redb.
//!
//! The session is a single logical slot: one named record holding the
//! serialized `{user_info, user_token}` snapshot. It is written on every
//! store mutation and read once at startup. Concurrent writers are not
//! coordinated; the last writer wins.

use std::path::PathBuf;

use log::warn;
use redb::{ReadableDatabase, ReadableTable};

use crate::model::UserSession;

const SESSION_TABLE: redb::TableDefinition<&str, &[u8]> = redb::TableDefinition::new("session");
const SESSION_RECORD: &str = "userStore";

/// Persistent session snapshot store backed by redb.
pub struct SnapshotStore {
    db: redb::Database,
}

impl SnapshotStore {
    /// Open or create a snapshot store at the given directory.
    pub fn open(base_dir: PathBuf) -> Result<Self, SnapshotError> {
        std::fs::create_dir_all(&base_dir)
            .map_err(|e| SnapshotError::Io(format!("Failed to create dir: {e}")))?;
        let db = redb::Database::create(base_dir.join("session.redb"))
            .map_err(|e| SnapshotError::Redb(format!("{e}")))?;
        Ok(Self { db })
    }

    /// Write the full session snapshot, replacing any previous record.
    pub fn save(&self, session: &UserSession) -> Result<(), SnapshotError> {
        let bytes = serde_json::to_vec(session)
            .map_err(|e| SnapshotError::Encode(format!("{e}")))?;
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| SnapshotError::Redb(format!("{e}")))?;
        {
            let mut table = write_txn
                .open_table(SESSION_TABLE)
                .map_err(|e| SnapshotError::Redb(format!("{e}")))?;
            table
                .insert(SESSION_RECORD, bytes.as_slice())
                .map_err(|e| SnapshotError::Redb(format!("{e}")))?;
        }
        write_txn
            .commit()
            .map_err(|e| SnapshotError::Redb(format!("{e}")))?;
        Ok(())
    }

    /// Load the persisted session snapshot, if one exists.
    ///
    /// Undecodable stored bytes degrade to `None` with a warning; startup
    /// must never fail on a stale or corrupt snapshot.
    pub fn load(&self) -> Option<UserSession> {
        let read_txn = self.db.begin_read().ok()?;
        let table = read_txn.open_table(SESSION_TABLE).ok()?;
        let entry = table.get(SESSION_RECORD).ok()??;
        match serde_json::from_slice(entry.value()) {
            Ok(session) => Some(session),
            Err(e) => {
                warn!("Discarding undecodable session snapshot: {e}");
                None
            },
        }
    }

    /// Remove the persisted snapshot. Idempotent.
    pub fn clear(&self) -> Result<(), SnapshotError> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| SnapshotError::Redb(format!("{e}")))?;
        {
            let mut table = write_txn
                .open_table(SESSION_TABLE)
                .map_err(|e| SnapshotError::Redb(format!("{e}")))?;
            let _ = table
                .remove(SESSION_RECORD)
                .map_err(|e| SnapshotError::Redb(format!("{e}")))?;
        }
        write_txn
            .commit()
            .map_err(|e| SnapshotError::Redb(format!("{e}")))?;
        Ok(())
    }

    /// Get the default storage directory for session data.
    pub fn default_data_dir() -> Option<PathBuf> {
        let mut dir = dirs::config_dir()?;
        dir.push("adminshell");
        dir.push("session");
        Some(dir)
    }
}

/// Errors from the snapshot store.
#[derive(Debug)]
pub enum SnapshotError {
    Io(String),
    Redb(String),
    Encode(String),
}

impl std::fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotError::Io(e) => write!(f, "IO error: {e}"),
            SnapshotError::Redb(e) => write!(f, "Redb error: {e}"),
            SnapshotError::Encode(e) => write!(f, "Encode error: {e}"),
        }
    }
}

impl std::error::Error for SnapshotError {}
