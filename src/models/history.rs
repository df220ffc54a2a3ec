//! Per-path edit history.
//!
//! Every opened source path owns a tree of derived artifacts. The tree is
//! append-only: nodes are never removed or reordered while the path is known,
//! and a whole tree disappears only through [`HistoryForest::evict`].
//!
//! All trees share one arena so a [`NodeKey`] stays valid across tab churn.
//! A node's tab binding is explicit: closing a tab turns `Live` into `Stale`
//! (detach), reopening turns it back into `Live` with a fresh id (attach).

use compact_str::CompactString;
use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::artifact::ArtifactPayload;
use super::ids::TabId;

new_key_type! { pub struct NodeKey; }

pub const DEFAULT_ROOT_PREFIX: &str = "(root)";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TabBinding {
    Unbound,
    Live(TabId),
    Stale(TabId),
}

impl TabBinding {
    /// The bound id, live or stale.
    pub fn id(self) -> Option<TabId> {
        match self {
            Self::Unbound => None,
            Self::Live(id) | Self::Stale(id) => Some(id),
        }
    }

    pub fn live(self) -> Option<TabId> {
        match self {
            Self::Live(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_stale(self) -> bool {
        matches!(self, Self::Stale(_))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NodeRef {
    Key(NodeKey),
    Tab(TabId),
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeRef::Key(key) => write!(f, "node {:?}", key),
            NodeRef::Tab(id) => write!(f, "tab {}", id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    #[error("history node not found: {target}")]
    NodeNotFound { target: NodeRef },
    #[error("history node {node:?} is already bound to tab {id}")]
    AlreadyBound { node: NodeKey, id: TabId },
}

#[derive(Debug, Clone)]
pub struct HistoryNode {
    name: CompactString,
    binding: TabBinding,
    artifact: Option<ArtifactPayload>,
    source_path: Option<PathBuf>,
    parent: Option<NodeKey>,
    children: Vec<NodeKey>,
}

impl HistoryNode {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> Option<TabId> {
        self.binding.id()
    }

    pub fn binding(&self) -> TabBinding {
        self.binding
    }

    pub fn artifact(&self) -> Option<&ArtifactPayload> {
        self.artifact.as_ref()
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// One line of a flattened history view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRow {
    pub key: NodeKey,
    pub depth: usize,
    pub name: CompactString,
    pub binding: TabBinding,
    pub has_children: bool,
}

/// A node that can be referenced by tab id, e.g. from a transform dialog picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub id: TabId,
    pub key: NodeKey,
    pub label: CompactString,
}

#[derive(Debug, Clone, Copy)]
struct RootEntry {
    key: NodeKey,
    version: u64,
}

#[derive(Debug)]
pub struct HistoryForest {
    arena: SlotMap<NodeKey, HistoryNode>,
    roots: BTreeMap<PathBuf, RootEntry>,
    by_tab: FxHashMap<TabId, NodeKey>,
    version: u64,
    root_prefix: CompactString,
}

impl Default for HistoryForest {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryForest {
    pub fn new() -> Self {
        Self::with_root_prefix(DEFAULT_ROOT_PREFIX)
    }

    pub fn with_root_prefix(prefix: &str) -> Self {
        Self {
            arena: SlotMap::with_key(),
            roots: BTreeMap::new(),
            by_tab: FxHashMap::default(),
            version: 0,
            root_prefix: CompactString::new(prefix),
        }
    }

    /// Global mutation counter; bumped by every structural or binding change.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn path_version(&self, path: &Path) -> Option<u64> {
        self.roots.get(path).map(|entry| entry.version)
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Number of nodes across the forest, roots included.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.roots.keys().map(PathBuf::as_path)
    }

    pub fn root(&self, path: &Path) -> Option<NodeKey> {
        self.roots.get(path).map(|entry| entry.key)
    }

    pub fn node(&self, key: NodeKey) -> Option<&HistoryNode> {
        self.arena.get(key)
    }

    pub fn contains(&self, key: NodeKey) -> bool {
        self.arena.contains_key(key)
    }

    pub fn path_of(&self, key: NodeKey) -> Option<&Path> {
        self.arena.get(key)?.source_path()
    }

    /// The opened artifact: first child of the path's root.
    pub fn first_child(&self, path: &Path) -> Option<NodeKey> {
        let root = self.root(path)?;
        self.arena.get(root)?.children.first().copied()
    }

    /// Builds the tree for a newly opened path: a container root with a single
    /// child carrying the opened artifact. The child has no tab id yet.
    ///
    /// Returns the existing root untouched if the path is already known.
    pub fn create_root(
        &mut self,
        path: PathBuf,
        artifact: ArtifactPayload,
        display_name: &str,
    ) -> NodeKey {
        if let Some(existing) = self.roots.get(&path) {
            tracing::warn!(path = %path.display(), "history root already exists");
            return existing.key;
        }

        let root = self.arena.insert(HistoryNode {
            name: CompactString::new(display_name),
            binding: TabBinding::Unbound,
            artifact: None,
            source_path: Some(path.clone()),
            parent: None,
            children: Vec::new(),
        });
        let mut child_name = self.root_prefix.clone();
        child_name.push_str(display_name);
        let child = self.arena.insert(HistoryNode {
            name: child_name,
            binding: TabBinding::Unbound,
            artifact: Some(artifact),
            source_path: Some(path.clone()),
            parent: Some(root),
            children: Vec::new(),
        });
        if let Some(node) = self.arena.get_mut(root) {
            node.children.push(child);
        }

        self.roots.insert(path.clone(), RootEntry { key: root, version: 0 });
        self.bump(&path);
        root
    }

    /// Depth-first search below `root` in child order. The root itself never
    /// matches. Live and stale ids both match.
    pub fn find_by_id(&self, root: NodeKey, id: TabId) -> Option<NodeKey> {
        let node = self.arena.get(root)?;
        let mut stack: Vec<NodeKey> = node.children.iter().rev().copied().collect();
        while let Some(key) = stack.pop() {
            let Some(node) = self.arena.get(key) else {
                continue;
            };
            if node.binding.id() == Some(id) {
                return Some(key);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        None
    }

    pub fn find_across_forest(&self, id: TabId) -> Option<NodeKey> {
        self.by_tab
            .get(&id)
            .copied()
            .filter(|key| self.arena.contains_key(*key))
    }

    /// Appends a fully formed leaf as the last child of `parent`.
    pub fn append_child(
        &mut self,
        parent: NodeKey,
        name: &str,
        artifact: ArtifactPayload,
        source_path: PathBuf,
    ) -> Result<NodeKey, HistoryError> {
        if !self.arena.contains_key(parent) {
            return Err(HistoryError::NodeNotFound {
                target: NodeRef::Key(parent),
            });
        }

        let child = self.arena.insert(HistoryNode {
            name: CompactString::new(name),
            binding: TabBinding::Unbound,
            artifact: Some(artifact),
            source_path: Some(source_path.clone()),
            parent: Some(parent),
            children: Vec::new(),
        });
        if let Some(node) = self.arena.get_mut(parent) {
            node.children.push(child);
        }
        self.bump(&source_path);
        Ok(child)
    }

    /// First binding of a node to a tab.
    pub fn bind_id(&mut self, node: NodeKey, id: TabId) -> Result<(), HistoryError> {
        let entry = self.arena.get_mut(node).ok_or(HistoryError::NodeNotFound {
            target: NodeRef::Key(node),
        })?;
        if let Some(existing) = entry.binding.id() {
            return Err(HistoryError::AlreadyBound {
                node,
                id: existing,
            });
        }
        entry.binding = TabBinding::Live(id);
        let path = entry.source_path.clone();
        self.by_tab.insert(id, node);
        if let Some(path) = path {
            self.bump(&path);
        }
        Ok(())
    }

    /// Marks the node bound to `id` as stale. Returns the node if a live
    /// binding was detached.
    pub fn detach_id(&mut self, id: TabId) -> Option<NodeKey> {
        let key = self.find_across_forest(id)?;
        let node = self.arena.get_mut(key)?;
        if node.binding != TabBinding::Live(id) {
            return None;
        }
        node.binding = TabBinding::Stale(id);
        let path = node.source_path.clone();
        if let Some(path) = path {
            self.bump(&path);
        }
        Some(key)
    }

    /// Binds a new tab to a node that has no live tab. Returns the stale id the
    /// node carried before, if any.
    pub fn attach_id(&mut self, node: NodeKey, id: TabId) -> Result<Option<TabId>, HistoryError> {
        let entry = self.arena.get_mut(node).ok_or(HistoryError::NodeNotFound {
            target: NodeRef::Key(node),
        })?;
        let previous = match entry.binding {
            TabBinding::Live(existing) => {
                return Err(HistoryError::AlreadyBound {
                    node,
                    id: existing,
                })
            }
            TabBinding::Stale(stale) => Some(stale),
            TabBinding::Unbound => None,
        };
        entry.binding = TabBinding::Live(id);
        let path = entry.source_path.clone();
        if let Some(stale) = previous {
            self.by_tab.remove(&stale);
        }
        self.by_tab.insert(id, node);
        if let Some(path) = path {
            self.bump(&path);
        }
        Ok(previous)
    }

    /// Drops a path's whole tree. Returns the number of nodes removed.
    pub fn evict(&mut self, path: &Path) -> Option<usize> {
        let entry = self.roots.remove(path)?;
        let mut removed = 0;
        let mut stack = vec![entry.key];
        while let Some(key) = stack.pop() {
            let Some(node) = self.arena.remove(key) else {
                continue;
            };
            if let Some(id) = node.binding.id() {
                if self.by_tab.get(&id) == Some(&key) {
                    self.by_tab.remove(&id);
                }
            }
            stack.extend(node.children);
            removed += 1;
        }
        self.version = self.version.saturating_add(1);
        Some(removed)
    }

    /// Number of nodes in a path's tree, root included.
    pub fn node_count(&self, path: &Path) -> usize {
        let Some(root) = self.root(path) else {
            return 0;
        };
        let mut count = 0;
        let mut stack = vec![root];
        while let Some(key) = stack.pop() {
            if let Some(node) = self.arena.get(key) {
                count += 1;
                stack.extend(node.children.iter().copied());
            }
        }
        count
    }

    /// Depth-first rows of a path's tree, root excluded; the root's children
    /// sit at depth 0.
    pub fn rows(&self, path: &Path) -> Vec<HistoryRow> {
        let mut rows = Vec::new();
        let Some(root) = self.root(path).and_then(|key| self.arena.get(key)) else {
            return rows;
        };
        let mut stack: Vec<(NodeKey, usize)> =
            root.children.iter().rev().map(|&key| (key, 0)).collect();
        while let Some((key, depth)) = stack.pop() {
            let Some(node) = self.arena.get(key) else {
                continue;
            };
            rows.push(HistoryRow {
                key,
                depth,
                name: node.name.clone(),
                binding: node.binding,
                has_children: !node.children.is_empty(),
            });
            stack.extend(node.children.iter().rev().map(|&child| (child, depth + 1)));
        }
        rows
    }

    /// Every node carrying a tab id, across all paths in path order.
    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.roots
            .keys()
            .flat_map(|path| self.rows(path))
            .filter_map(|row| {
                Some(HistoryEntry {
                    id: row.binding.id()?,
                    key: row.key,
                    label: row.name,
                })
            })
            .collect()
    }

    fn bump(&mut self, path: &Path) {
        self.version = self.version.saturating_add(1);
        if let Some(entry) = self.roots.get_mut(path) {
            entry.version = entry.version.saturating_add(1);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/history.rs"]
mod tests;
