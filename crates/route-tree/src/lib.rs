/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Flatten, rebuild, and path-composition operations over parent-referencing
//! node lists.
//!
//! The backing data is a flat collection of records where each record names
//! its parent by id. All operations here treat that collection as an arena:
//! an id index is built once per snapshot and trees/paths are derived as pure
//! functions over it. Source records are never mutated in place.

use std::collections::{HashMap, HashSet};

/// A node that participates in a parent-referencing tree.
///
/// Implementors carry both the flat form (`parent_id` back-reference) and the
/// nested form (`children`); either may be empty depending on how the
/// collection was produced.
pub trait TreeNode: Sized {
    /// Stable identity, unique within one collection.
    fn id(&self) -> &str;

    /// Parent reference; `None` marks a root-level node.
    fn parent_id(&self) -> Option<&str>;

    /// Path segment this node contributes. May be empty for pure grouping
    /// nodes, which collapse out of composed paths.
    fn segment(&self) -> &str;

    /// Nested children, populated only in tree form.
    fn children(&self) -> &[Self];

    /// Returns a copy of this node with the given children attached.
    fn with_children(&self, children: Vec<Self>) -> Self;
}

/// Id lookup over a flat node collection.
///
/// Built once per snapshot; later ids win on duplicate, matching
/// last-writer-wins semantics elsewhere in the session model.
pub struct NodeIndex<'a, N> {
    by_id: HashMap<&'a str, &'a N>,
}

impl<'a, N: TreeNode> NodeIndex<'a, N> {
    pub fn new(flat: &'a [N]) -> Self {
        let mut by_id = HashMap::with_capacity(flat.len());
        for node in flat {
            by_id.insert(node.id(), node);
        }
        Self { by_id }
    }

    pub fn get(&self, id: &str) -> Option<&'a N> {
        self.by_id.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// Result of composing the full path for a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullPath {
    /// `/`-joined segments from root to node, empty segments excluded.
    pub path: String,
    /// True when the ancestor walk stopped at a dangling or cyclic
    /// `parent_id` instead of a genuine root. The composed path is the best
    /// available prefix, not a validated one.
    pub truncated: bool,
}

/// Pre-order traversal producing every node, nested children included, as a
/// single ordered sequence. Pure; the input is not mutated.
pub fn flatten<N: TreeNode + Clone>(nodes: &[N]) -> Vec<N> {
    let mut out = Vec::new();
    collect_preorder(nodes, &mut out);
    out
}

fn collect_preorder<N: TreeNode + Clone>(nodes: &[N], out: &mut Vec<N>) {
    for node in nodes {
        out.push(node.clone());
        collect_preorder(node.children(), out);
    }
}

/// Composes the full path for `node` by walking `parent_id` references
/// upward through `index`, prepending each ancestor's segment.
///
/// A dangling `parent_id` (or a cycle) truncates the walk at that point
/// rather than failing; callers decide whether the truncation is worth a
/// warning.
pub fn full_path<N: TreeNode>(node: &N, index: &NodeIndex<'_, N>) -> FullPath {
    let mut segments = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut current = node;
    let truncated = loop {
        if !seen.insert(current.id()) {
            // Cycle in parent references; stop where we are.
            break true;
        }
        if !current.segment().is_empty() {
            segments.push(current.segment());
        }
        let Some(parent_id) = current.parent_id() else {
            break false;
        };
        match index.get(parent_id) {
            Some(parent) => current = parent,
            None => break true,
        }
    };
    segments.reverse();
    FullPath {
        path: format!("/{}", segments.join("/")),
        truncated,
    }
}

/// Reconstructs the nested tree from a flat parent-referencing list.
///
/// Children attach to their parent in input order. A node whose `parent_id`
/// does not resolve within the list falls back to root level rather than
/// being dropped. The input records are cloned, never mutated.
pub fn rebuild<N: TreeNode + Clone>(flat: &[N]) -> Vec<N> {
    let ids: HashSet<&str> = flat.iter().map(|n| n.id()).collect();

    let mut children_of: HashMap<&str, Vec<&N>> = HashMap::new();
    let mut roots: Vec<&N> = Vec::new();
    for node in flat {
        match node.parent_id() {
            Some(parent_id) if ids.contains(parent_id) && parent_id != node.id() => {
                children_of.entry(parent_id).or_default().push(node);
            },
            _ => roots.push(node),
        }
    }

    roots
        .into_iter()
        .map(|root| attach_children(root, &children_of, &mut HashSet::new()))
        .collect()
}

fn attach_children<'a, N: TreeNode + Clone>(
    node: &'a N,
    children_of: &HashMap<&str, Vec<&'a N>>,
    visiting: &mut HashSet<&'a str>,
) -> N {
    if !visiting.insert(node.id()) {
        // Cycle guard; emit the node as a leaf.
        return node.with_children(Vec::new());
    }
    let children = children_of
        .get(node.id())
        .map(|kids| {
            kids.iter()
                .map(|&kid| attach_children(kid, children_of, visiting))
                .collect()
        })
        .unwrap_or_default();
    visiting.remove(node.id());
    node.with_children(children)
}
