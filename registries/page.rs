/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Lookup from a permission's `component` path to a page implementation.
//!
//! Backend payloads are inconsistent about component spelling: with or
//! without a leading slash, with or without a trailing `/index`. Resolution
//! therefore tries several normalization candidates in a fixed order before
//! giving up, and an unresolved component falls back to the empty page so the
//! route build always completes.

use std::collections::HashMap;

/// Identifier of the page bound when no registration matches.
pub const EMPTY_PAGE_ID: &str = "page:empty";

/// Outcome of resolving a component path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSelection {
    pub page_id: &'static str,
    pub fallback_used: bool,
    /// Which normalization candidate matched: `"verbatim"`, `"rooted"`,
    /// `"stripped-index"`, `"appended-index"`, or `"fallback"`.
    pub matched_by: &'static str,
}

/// Registry of known page implementations keyed by normalized path.
#[derive(Debug, Clone)]
pub struct PageRegistry {
    pages: HashMap<String, &'static str>,
    fallback_page_id: &'static str,
}

impl PageRegistry {
    pub fn new(fallback_page_id: &'static str) -> Self {
        Self {
            pages: HashMap::new(),
            fallback_page_id,
        }
    }

    /// Registers a page under its canonical path (leading slash, no `/index`
    /// suffix). The stored key is normalized so lookups are spelling-stable.
    pub fn register(&mut self, path: &str, page_id: &'static str) {
        self.pages.insert(canonicalize(path), page_id);
    }

    /// Resolves a component path, trying each normalization candidate in
    /// order. The first registered match wins; otherwise the fallback page is
    /// selected with `fallback_used` set.
    pub fn resolve(&self, component: &str) -> PageSelection {
        for (candidate, matched_by) in candidates(component) {
            if let Some(page_id) = self.pages.get(&candidate) {
                return PageSelection {
                    page_id,
                    fallback_used: false,
                    matched_by,
                };
            }
        }
        PageSelection {
            page_id: self.fallback_page_id,
            fallback_used: true,
            matched_by: "fallback",
        }
    }

    pub fn contains(&self, component: &str) -> bool {
        !self.resolve(component).fallback_used
    }

    /// Registry seeded with the pages every deployment carries.
    pub fn core_seed() -> Self {
        let mut registry = Self::new(EMPTY_PAGE_ID);
        registry.register("/dashboard/workbench", "page:workbench");
        registry.register("/dashboard/analysis", "page:analysis");
        registry.register("/management/system/user", "page:system-user");
        registry.register("/management/system/role", "page:system-role");
        registry.register("/management/system/permission", "page:system-permission");
        registry.register("/management/user/profile", "page:user-profile");
        registry.register("/sys/others/iframe", "page:frame");
        registry
    }
}

/// Normalization candidates for a component path, most specific first.
fn candidates(component: &str) -> Vec<(String, &'static str)> {
    let trimmed = component.trim();
    let rooted = if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    };

    let mut out = vec![
        (trimmed.to_string(), "verbatim"),
        (rooted.clone(), "rooted"),
    ];
    if let Some(stripped) = rooted.strip_suffix("/index") {
        out.push((stripped.to_string(), "stripped-index"));
    } else {
        out.push((format!("{rooted}/index"), "appended-index"));
    }
    out
}

fn canonicalize(path: &str) -> String {
    let trimmed = path.trim();
    let rooted = if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    };
    rooted
        .strip_suffix("/index")
        .map(str::to_string)
        .unwrap_or(rooted)
}
