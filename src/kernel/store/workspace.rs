use std::path::Path;

use crate::kernel::workspace::{TabContent, WorkspaceEvent};
use crate::kernel::{Action, CoreEvent};
use crate::models::TabId;

use super::DispatchResult;

impl super::Store {
    pub(super) fn reduce_workspace_action(&mut self, action: Action) -> DispatchResult {
        let changed = match action {
            Action::WorkspaceSelectTab { id } => self.state.workspace.select_tab(id),
            Action::WorkspaceActivateTabset { tabset } => {
                self.state.workspace.activate_tabset(tabset)
            }
            Action::WorkspaceCloseTab { id } => self.state.workspace.close_tab(id).is_some(),
            _ => false,
        };
        let pumped = self.pump_workspace();
        DispatchResult::changed(changed || pumped)
    }

    /// Drains workspace events in order. Close handling runs for every closed
    /// tab before the selection is recomputed.
    pub(super) fn pump_workspace(&mut self) -> bool {
        let events = self.state.workspace.drain_events();
        let mut changed = !events.is_empty();
        for event in events {
            if let WorkspaceEvent::TabClosed { id, content } = &event {
                self.tab_closed(*id, content);
            }
            self.emit(CoreEvent::Workspace(event));
        }
        changed |= self.resync_selection();
        changed
    }

    fn tab_closed(&mut self, id: TabId, content: &TabContent) {
        let detached = self.state.history.detach_id(id);
        let path = detached.and_then(|node| self.state.history.path_of(node));
        match path.map(Path::to_path_buf) {
            Some(path) => {
                tracing::debug!(path = %path.display(), tab = id.raw(), "history node detached");
                self.touch(path);
            }
            None => {
                if let Some(path) = content.artifact_path() {
                    tracing::warn!(
                        path = %path.display(),
                        tab = id.raw(),
                        "closed artifact tab had no live history node"
                    );
                }
            }
        }
    }

    /// Mirrors the workspace selection and moves the selected path's
    /// `Viewing` node along with it.
    fn resync_selection(&mut self) -> bool {
        if !self.state.selection.resync(&self.state.workspace) {
            return false;
        }
        let current = self.state.selection.get().cloned();
        if let Some(selection) = &current {
            if let Some(node) = self.state.history.find_across_forest(selection.tab) {
                self.state.viewing.insert(selection.path.clone(), node);
            }
        }
        self.emit(CoreEvent::SelectionChanged(current));
        true
    }
}
