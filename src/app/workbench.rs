use std::path::PathBuf;

use super::command::{parse_line, HostCommand, HELP};
use super::render;
use crate::kernel::services::adapters::{AppMessage, AsyncRuntime};
use crate::kernel::services::ports::Settings;
use crate::kernel::{Action, AppState, Store};
use crate::models::NodeKey;

#[derive(Debug, Default)]
pub struct Reply {
    pub lines: Vec<String>,
    pub quit: bool,
}

impl Reply {
    fn lines(lines: Vec<String>) -> Self {
        Self { lines, quit: false }
    }

    fn line(line: impl Into<String>) -> Self {
        Self::lines(vec![line.into()])
    }
}

/// Connects the store to the async runtime and the host's text input.
pub struct Workbench {
    store: Store,
    runtime: AsyncRuntime,
    /// Node keys of the last `tree` listing.
    rows: Vec<NodeKey>,
}

impl Workbench {
    pub fn new(settings: Settings, runtime: AsyncRuntime) -> Self {
        Self {
            store: Store::new(AppState::new(settings)),
            runtime,
            rows: Vec::new(),
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn handle_message(&mut self, msg: AppMessage) -> Reply {
        match msg {
            AppMessage::Input(line) => self.handle_line(&line),
            AppMessage::InputClosed => Reply {
                lines: Vec::new(),
                quit: true,
            },
            other => {
                let listed = matches!(other, AppMessage::DirectoryListed { result: Ok(_), .. });
                let Some(action) = other.into_action() else {
                    return Reply::default();
                };
                let mut lines = self.dispatch_kernel(action);
                let state = self.store.state();
                if let Some(listing) = state.explorer.listing.as_ref().filter(|_| listed) {
                    lines.extend(render::render_listing(listing, &state.settings));
                }
                Reply::lines(lines)
            }
        }
    }

    pub fn handle_line(&mut self, line: &str) -> Reply {
        if line.trim().is_empty() {
            return Reply::default();
        }
        let command = match parse_line(line) {
            Ok(command) => command,
            Err(e) => return Reply::line(format!("[error] {e}")),
        };
        tracing::debug!(?command, "host command");

        let action = match command {
            HostCommand::Open(path) => Action::OpenPath(path),
            HostCommand::Folder(path) => Action::OpenFolder(path),
            HostCommand::Select(row) => match self.row(row) {
                Ok(node) => Action::HistorySelect { node },
                Err(reply) => return reply,
            },
            HostCommand::Tab(id) => Action::WorkspaceSelectTab { id },
            HostCommand::Activate(tabset) => Action::WorkspaceActivateTabset { tabset },
            HostCommand::Close(id) => Action::WorkspaceCloseTab { id },
            HostCommand::Evict(path) => Action::EvictPath(path),
            HostCommand::Transform(kind) => Action::OpenTransformDialog { kind },
            HostCommand::Source(id) => Action::SetTransformSource { id },
            HostCommand::Secondary(id) => Action::SetTransformSecondary { id },
            HostCommand::Args(args) => Action::SetTransformArgs(args),
            HostCommand::Name(name) => Action::SetTransformName(name),
            HostCommand::Apply => Action::ApplyTransform,
            HostCommand::Confirm => Action::ConfirmTransform,
            HostCommand::Cancel => Action::CloseTransformDialog,
            HostCommand::Export { row, destination } => match self.row(row) {
                Ok(node) => Action::ExportNode { node, destination },
                Err(reply) => return reply,
            },
            HostCommand::Tree => {
                let state = self.store.state();
                let (lines, keys) = render::render_tree(&state.history, state.selection.get());
                self.rows = keys;
                return Reply::lines(lines);
            }
            HostCommand::Tabs => return Reply::lines(render::render_tabs(&self.store.state().workspace)),
            HostCommand::Kinds => return Reply::lines(render::render_kinds()),
            HostCommand::Help => return Reply::lines(HELP.lines().map(str::to_string).collect()),
            HostCommand::Quit => {
                return Reply {
                    lines: Vec::new(),
                    quit: true,
                }
            }
        };

        let shows_dialog = matches!(
            action,
            Action::OpenTransformDialog { .. }
                | Action::SetTransformSource { .. }
                | Action::SetTransformSecondary { .. }
                | Action::SetTransformArgs(_)
                | Action::SetTransformName(_)
        );
        let mut lines = self.dispatch_kernel(action);
        if shows_dialog {
            if let Some(dialog) = self.store.state().dialog.as_ref() {
                lines.extend(render::render_dialog(dialog));
            }
        }
        Reply::lines(lines)
    }

    pub fn open_folder(&mut self, root: PathBuf) -> Reply {
        Reply::lines(self.dispatch_kernel(Action::OpenFolder(root)))
    }

    fn dispatch_kernel(&mut self, action: Action) -> Vec<String> {
        let result = self.store.dispatch(action);
        for effect in result.effects {
            self.runtime.execute(effect);
        }
        result.events.iter().filter_map(render::render_event).collect()
    }

    fn row(&self, row: usize) -> Result<NodeKey, Reply> {
        self.rows
            .get(row.wrapping_sub(1))
            .copied()
            .ok_or_else(|| Reply::line(format!("[error] no row {row}; run `tree` first")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/app/workbench.rs"]
mod tests;
