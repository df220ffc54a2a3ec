use std::path::PathBuf;

use super::{Action, AppState, CoreError, CoreEvent, Effect, HistoryError, MessageLevel};

mod explorer;
mod history;
mod transform;
mod workspace;

#[derive(Debug, Default)]
pub struct DispatchResult {
    pub effects: Vec<Effect>,
    pub events: Vec<CoreEvent>,
    pub state_changed: bool,
}

impl DispatchResult {
    fn unchanged() -> Self {
        Self::default()
    }

    fn changed(state_changed: bool) -> Self {
        Self {
            state_changed,
            ..Self::default()
        }
    }

    fn effect(effect: Effect) -> Self {
        Self {
            effects: vec![effect],
            ..Self::default()
        }
    }
}

pub struct Store {
    state: AppState,
    events: Vec<CoreEvent>,
    touched: Vec<PathBuf>,
}

impl Store {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            events: Vec::new(),
            touched: Vec::new(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Processes one action to completion. History notifications are
    /// coalesced per path and follow the workspace and selection events.
    pub fn dispatch(&mut self, action: Action) -> DispatchResult {
        let mut result = match action {
            Action::OpenPath(path) => self.open_path(path),
            Action::ArtifactDecoded { path, result } => self.artifact_decoded(path, result),
            Action::HistorySelect { node } => self.history_select(node),
            Action::HistorySelectTab { id } => self.history_select_tab(id),
            Action::EvictPath(path) => self.evict_path(path),

            Action::WorkspaceSelectTab { .. }
            | Action::WorkspaceActivateTabset { .. }
            | Action::WorkspaceCloseTab { .. } => self.reduce_workspace_action(action),

            Action::OpenTransformDialog { .. }
            | Action::SetTransformSource { .. }
            | Action::SetTransformSecondary { .. }
            | Action::SetTransformArgs(_)
            | Action::SetTransformName(_)
            | Action::ApplyTransform
            | Action::TransformFinished { .. }
            | Action::ConfirmTransform
            | Action::CloseTransformDialog => self.reduce_transform_action(action),

            Action::OpenFolder(_)
            | Action::DirectoryListed { .. }
            | Action::ExportNode { .. }
            | Action::ExportFinished { .. } => self.reduce_explorer_action(action),
        };

        for path in std::mem::take(&mut self.touched) {
            let version = self.state.history.path_version(&path);
            self.events.push(CoreEvent::HistoryChanged { path, version });
        }
        result.events = std::mem::take(&mut self.events);
        result
    }

    fn emit(&mut self, event: CoreEvent) {
        self.events.push(event);
    }

    fn message(&mut self, level: MessageLevel, text: impl Into<String>) {
        self.emit(CoreEvent::Message {
            level,
            text: text.into(),
        });
    }

    /// Marks a path's history as changed for this dispatch.
    fn touch(&mut self, path: PathBuf) {
        if !self.touched.contains(&path) {
            self.touched.push(path);
        }
    }

    /// Structural errors mean the forest and the workspace disagree; they are
    /// never swallowed. Everything else is a recoverable user-facing failure.
    fn report(&mut self, err: impl Into<CoreError>) {
        let err = err.into();
        let level = if err.is_structural() {
            tracing::error!(error = %err, "history and workspace diverged");
            debug_assert!(
                !matches!(err, CoreError::History(HistoryError::AlreadyBound { .. })),
                "{err}"
            );
            MessageLevel::Error
        } else {
            tracing::warn!(error = %err, "operation failed");
            MessageLevel::Warn
        };
        self.message(level, err.to_string());
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/store.rs"]
mod tests;
