/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The open-tab list mirroring visited routes.
//!
//! Tabs are keyed by route path; the key is the tab's identity and the list
//! order is the display order. The active tab is always derived from the
//! current route path, never tracked separately, so the selected tab and the
//! rendered route cannot diverge.

use std::collections::BTreeMap;

use time::OffsetDateTime;

use crate::routes::ResolvedRoute;

/// One open tab.
#[derive(Debug, Clone, PartialEq)]
pub struct Tab {
    /// Route path; unique within the list.
    pub key: String,
    pub label: String,
    /// Route parameter bindings the tab was opened with.
    pub params: BTreeMap<String, String>,
    /// Transient tabs that must not persist across navigations.
    pub hide_tab: bool,
    /// Freshness marker; a new value forces the hosted content to remount.
    pub time_stamp: i128,
}

/// Outcome of closing a tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseOutcome {
    pub removed: bool,
    /// Path to navigate to when the closed tab was the active one: the
    /// neighbor that took its place, else the new last tab, else none.
    pub fallback: Option<String>,
}

/// Ordered tab list with route-driven lifecycle.
#[derive(Debug, Default)]
pub struct TabSession {
    tabs: Vec<Tab>,
    last_stamp: i128,
}

impl TabSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    /// The active tab for the current route path, if one is open.
    pub fn active(&self, current_path: &str) -> Option<&Tab> {
        self.tabs.iter().find(|tab| tab.key == current_path)
    }

    /// Route-change transition. Hidden-tab routes produce no tab; otherwise
    /// stale hidden tabs are pruned and a tab for the route is appended
    /// unless one already exists (tab keys never duplicate).
    pub fn sync_active_route(&mut self, route: &ResolvedRoute) {
        if route.meta.hide_tab {
            return;
        }
        self.tabs.retain(|tab| !tab.hide_tab);
        if self.tabs.iter().any(|tab| tab.key == route.meta.key) {
            return;
        }
        let time_stamp = self.next_stamp();
        self.tabs.push(Tab {
            key: route.meta.key.clone(),
            label: route.meta.label.clone(),
            params: route.params.clone(),
            hide_tab: route.meta.hide_tab,
            time_stamp,
        });
    }

    /// Close one tab. `active_path` decides whether a fallback navigation
    /// target is produced.
    pub fn close(&mut self, key: &str, active_path: &str) -> CloseOutcome {
        let Some(position) = self.tabs.iter().position(|tab| tab.key == key) else {
            return CloseOutcome {
                removed: false,
                fallback: None,
            };
        };
        self.tabs.remove(position);

        let fallback = if key == active_path {
            self.tabs
                .get(position)
                .or_else(|| self.tabs.last())
                .map(|tab| tab.key.clone())
        } else {
            None
        };
        CloseOutcome {
            removed: true,
            fallback,
        }
    }

    /// Keep only the tab matching `key`.
    pub fn close_others(&mut self, key: &str) {
        self.tabs.retain(|tab| tab.key == key);
    }

    pub fn close_all(&mut self) {
        self.tabs.clear();
    }

    /// Close every tab positioned before `key`. Unknown keys are a no-op.
    pub fn close_left(&mut self, key: &str) {
        if let Some(position) = self.tabs.iter().position(|tab| tab.key == key) {
            self.tabs.drain(..position);
        }
    }

    /// Close every tab positioned after `key`. Unknown keys are a no-op.
    pub fn close_right(&mut self, key: &str) {
        if let Some(position) = self.tabs.iter().position(|tab| tab.key == key) {
            self.tabs.truncate(position + 1);
        }
    }

    /// Regenerate the freshness marker of the matching tab only. Returns
    /// whether a tab matched.
    pub fn refresh(&mut self, key: &str) -> bool {
        let stamp = self.next_stamp();
        match self.tabs.iter_mut().find(|tab| tab.key == key) {
            Some(tab) => {
                tab.time_stamp = stamp;
                true
            },
            None => false,
        }
    }

    /// Move one tab from `old_index` to `new_index`, preserving the relative
    /// order of all other tabs. Out-of-range indices are a no-op.
    pub fn reorder(&mut self, old_index: usize, new_index: usize) -> bool {
        if old_index >= self.tabs.len() || new_index >= self.tabs.len() {
            return false;
        }
        let tab = self.tabs.remove(old_index);
        self.tabs.insert(new_index, tab);
        true
    }

    /// Wall-clock nanoseconds, monotonized so two refreshes within one clock
    /// tick still produce distinct markers.
    fn next_stamp(&mut self) -> i128 {
        let now = OffsetDateTime::now_utc().unix_timestamp_nanos();
        self.last_stamp = if now > self.last_stamp {
            now
        } else {
            self.last_stamp + 1
        };
        self.last_stamp
    }
}
