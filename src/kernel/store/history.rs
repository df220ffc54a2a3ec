//! Open, reselect and evict: the transitions that bind history nodes to tabs.

use std::path::{Path, PathBuf};

use crate::kernel::error::CollaboratorError;
use crate::kernel::workspace::TabContent;
use crate::kernel::{Effect, HistoryError, MessageLevel, SessionError};
use crate::models::{ArtifactPayload, NodeKey, NodeRef, TabBinding, TabId};

use super::DispatchResult;

impl super::Store {
    pub(super) fn open_path(&mut self, path: PathBuf) -> DispatchResult {
        if !self.state.settings.can_open(&path) {
            tracing::warn!(path = %path.display(), "unsupported file type");
            self.message(
                MessageLevel::Warn,
                format!("cannot open {}: unsupported file type", path.display()),
            );
            return DispatchResult::unchanged();
        }
        if self.state.history.root(&path).is_some() {
            return self.reopen_path(&path);
        }
        if !self.state.pending_decodes.insert(path.clone()) {
            tracing::debug!(path = %path.display(), "decode already pending");
            return DispatchResult::unchanged();
        }
        DispatchResult::effect(Effect::DecodeArtifact(path))
    }

    pub(super) fn artifact_decoded(
        &mut self,
        path: PathBuf,
        result: Result<ArtifactPayload, CollaboratorError>,
    ) -> DispatchResult {
        let was_pending = self.state.pending_decodes.remove(&path);
        let payload = match result {
            Ok(payload) => payload,
            Err(err) => {
                self.report(err);
                return DispatchResult::changed(was_pending);
            }
        };
        if self.state.history.root(&path).is_some() {
            return self.reopen_path(&path);
        }

        let display_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        let root = self
            .state
            .history
            .create_root(path.clone(), payload, &display_name);
        self.touch(path.clone());
        tracing::info!(path = %path.display(), "history root created");
        self.select_node(root)
    }

    pub(super) fn history_select(&mut self, node: NodeKey) -> DispatchResult {
        self.select_node(node)
    }

    pub(super) fn history_select_tab(&mut self, id: TabId) -> DispatchResult {
        match self.state.history.find_across_forest(id) {
            Some(node) => self.select_node(node),
            None => {
                self.report(SessionError::UnknownTab(id));
                DispatchResult::unchanged()
            }
        }
    }

    pub(super) fn evict_path(&mut self, path: PathBuf) -> DispatchResult {
        if self.state.history.root(&path).is_none() {
            self.message(
                MessageLevel::Warn,
                format!("{} has no history", path.display()),
            );
            return DispatchResult::unchanged();
        }

        for id in self.state.workspace.tabs_for_path(&path) {
            self.state.workspace.close_tab(id);
        }
        self.pump_workspace();

        let removed = self.state.history.evict(&path).unwrap_or(0);
        self.state.viewing.remove(&path);
        self.touch(path.clone());
        tracing::info!(path = %path.display(), removed, "history evicted");

        let history = &self.state.history;
        if let Some(dialog) = self.state.dialog.as_mut() {
            if dialog.source.as_ref().is_some_and(|s| s.path == path) {
                dialog.set_source(None);
            }
            if dialog
                .secondary
                .as_ref()
                .is_some_and(|s| history.find_across_forest(s.tab).is_none())
            {
                dialog.set_secondary(None);
            }
        }
        DispatchResult::changed(true)
    }

    /// Re-entering an already known path reselects its opened artifact.
    fn reopen_path(&mut self, path: &Path) -> DispatchResult {
        match self.state.history.root(path) {
            Some(root) => self.select_node(root),
            None => DispatchResult::unchanged(),
        }
    }

    /// Brings `node` to the front: selects its live tab, or opens a new one
    /// when the node has none.
    pub(super) fn select_node(&mut self, node: NodeKey) -> DispatchResult {
        let Some(entry) = self.state.history.node(node) else {
            self.report(HistoryError::NodeNotFound {
                target: NodeRef::Key(node),
            });
            return DispatchResult::unchanged();
        };
        if entry.is_root() {
            return match entry.children().first().copied() {
                Some(first) => self.select_node(first),
                None => {
                    self.report(HistoryError::NodeNotFound {
                        target: NodeRef::Key(node),
                    });
                    DispatchResult::unchanged()
                }
            };
        }

        match entry.binding() {
            TabBinding::Live(id) if self.state.workspace.contains(id) => {
                self.state.workspace.select_tab(id);
                if let Some(path) = self.state.history.path_of(node).map(Path::to_path_buf) {
                    self.state.viewing.insert(path, node);
                }
            }
            TabBinding::Live(id) => {
                tracing::error!(tab = id.raw(), "live history binding names a missing tab");
                self.message(
                    MessageLevel::Error,
                    format!("tab {id} disappeared without closing; reopening"),
                );
                if let Some(path) = self
                    .state
                    .history
                    .detach_id(id)
                    .and_then(|key| self.state.history.path_of(key))
                    .map(Path::to_path_buf)
                {
                    self.touch(path);
                }
                if let Err(err) = self.open_node_tab(node) {
                    self.report(err);
                }
            }
            TabBinding::Unbound | TabBinding::Stale(_) => {
                if let Err(err) = self.open_node_tab(node) {
                    self.report(err);
                }
            }
        }
        self.pump_workspace();
        DispatchResult::changed(true)
    }

    /// Opens a tab for a node without a live tab and binds the new id: a
    /// first bind for unbound nodes, an attach for stale ones.
    pub(super) fn open_node_tab(&mut self, node: NodeKey) -> Result<TabId, HistoryError> {
        let not_found = HistoryError::NodeNotFound {
            target: NodeRef::Key(node),
        };
        let entry = self.state.history.node(node).ok_or(not_found.clone())?;
        if let Some(id) = entry.binding().live() {
            return Err(HistoryError::AlreadyBound { node, id });
        }
        let artifact = entry.artifact().cloned().ok_or(not_found.clone())?;
        let path = entry.source_path().map(Path::to_path_buf).ok_or(not_found)?;
        let name = entry.name().to_string();
        let stale = entry.binding().is_stale();

        let id = self.state.workspace.open_tab(
            None,
            &name,
            TabContent::Artifact {
                path: path.clone(),
                payload: artifact,
            },
        );
        self.state.workspace.on_close(id);
        if stale {
            let previous = self.state.history.attach_id(node, id)?;
            tracing::info!(
                path = %path.display(),
                tab = id.raw(),
                stale = previous.map(TabId::raw),
                "history node reattached"
            );
        } else {
            self.state.history.bind_id(node, id)?;
            tracing::debug!(path = %path.display(), tab = id.raw(), "history node bound");
        }
        self.state.viewing.insert(path.clone(), node);
        self.touch(path);
        Ok(id)
    }
}
