//! Transform dialog: source selection, engine calls and confirmation.

use std::path::Path;

use crate::kernel::error::CollaboratorError;
use crate::kernel::transform::{
    Completion, DialogSecondary, DialogSource, TransformDialog, TransformTicket,
};
use crate::kernel::{Action, Effect, HistoryError, MessageLevel, SessionError};
use crate::models::{ArtifactPayload, NodeRef, TabId, TransformKind};

use super::DispatchResult;

impl super::Store {
    pub(super) fn reduce_transform_action(&mut self, action: Action) -> DispatchResult {
        match action {
            Action::OpenTransformDialog { kind } => self.open_transform_dialog(kind),
            Action::SetTransformSource { id } => self.set_transform_source(id),
            Action::SetTransformSecondary { id } => {
                let Some(source) = self.resolve_source(id) else {
                    return self.missing_tab(id);
                };
                let secondary = DialogSecondary {
                    tab: id,
                    artifact: source.artifact,
                };
                self.with_dialog(|dialog| {
                    dialog.set_secondary(Some(secondary));
                    true
                })
            }
            Action::SetTransformArgs(args) => {
                let mut ignored = None;
                let result = self.with_dialog(|dialog| {
                    let accepted = dialog.set_args(args);
                    if !accepted {
                        ignored = Some(dialog.kind);
                    }
                    accepted
                });
                if let Some(kind) = ignored {
                    self.message(
                        MessageLevel::Info,
                        format!("{} takes no arguments", kind.label()),
                    );
                }
                result
            }
            Action::SetTransformName(name) => self.with_dialog(|dialog| {
                dialog.set_name(name);
                true
            }),
            Action::ApplyTransform => self.apply_transform(),
            Action::TransformFinished { ticket, result } => self.transform_finished(ticket, result),
            Action::ConfirmTransform => self.confirm_transform(),
            Action::CloseTransformDialog => self.close_transform_dialog(),
            _ => DispatchResult::unchanged(),
        }
    }

    fn open_transform_dialog(&mut self, kind: TransformKind) -> DispatchResult {
        self.close_transform_dialog();
        let id = self.state.next_dialog_id;
        self.state.next_dialog_id = self.state.next_dialog_id.saturating_add(1);
        let source = self
            .state
            .selection
            .get()
            .map(|selection| selection.tab)
            .and_then(|tab| self.resolve_source(tab));
        tracing::debug!(dialog = id, kind = %kind, "transform dialog opened");
        self.state.dialog = Some(TransformDialog::new(id, kind, source));
        DispatchResult::changed(true)
    }

    /// The picked source is brought to the front, so the result is always
    /// appended under the node being viewed.
    fn set_transform_source(&mut self, id: TabId) -> DispatchResult {
        if self.state.dialog.is_none() {
            self.report(SessionError::NoDialog);
            return DispatchResult::unchanged();
        }
        let Some(node) = self.state.history.find_across_forest(id) else {
            return self.missing_tab(id);
        };
        self.select_node(node);

        let live = self
            .state
            .history
            .node(node)
            .and_then(|entry| entry.binding().live());
        let Some(source) = live.and_then(|tab| self.resolve_source(tab)) else {
            return DispatchResult::changed(true);
        };
        self.with_dialog(|dialog| {
            dialog.set_source(Some(source));
            true
        })
    }

    fn close_transform_dialog(&mut self) -> DispatchResult {
        let Some(mut dialog) = self.state.dialog.take() else {
            return DispatchResult::unchanged();
        };
        if dialog.session.is_pending() {
            tracing::debug!(dialog = dialog.id, "pending transform orphaned");
        }
        dialog.session.invalidate();
        DispatchResult::changed(true)
    }

    fn apply_transform(&mut self) -> DispatchResult {
        let Some(dialog) = self.state.dialog.as_mut() else {
            self.report(SessionError::NoDialog);
            return DispatchResult::unchanged();
        };
        match dialog.apply() {
            Ok((ticket, request)) => {
                tracing::debug!(
                    dialog = ticket.dialog,
                    generation = ticket.generation,
                    kind = %request.kind,
                    "transform requested"
                );
                DispatchResult {
                    effects: vec![Effect::RunTransform { ticket, request }],
                    state_changed: true,
                    ..DispatchResult::default()
                }
            }
            Err(err) => {
                self.report(err);
                DispatchResult::unchanged()
            }
        }
    }

    fn transform_finished(
        &mut self,
        ticket: TransformTicket,
        result: Result<ArtifactPayload, CollaboratorError>,
    ) -> DispatchResult {
        let Some(dialog) = self
            .state
            .dialog
            .as_mut()
            .filter(|dialog| dialog.id == ticket.dialog)
        else {
            tracing::debug!(
                dialog = ticket.dialog,
                generation = ticket.generation,
                "transform result for a closed dialog dropped"
            );
            return DispatchResult::unchanged();
        };
        match dialog.session.complete(ticket, result) {
            Completion::Ready => {
                let kind = dialog.kind;
                self.message(
                    MessageLevel::Info,
                    format!("{} ready, confirm to keep it", kind.label()),
                );
                DispatchResult::changed(true)
            }
            Completion::Failed(err) => {
                self.report(err);
                DispatchResult::changed(true)
            }
            Completion::Discarded => {
                tracing::debug!(
                    dialog = ticket.dialog,
                    generation = ticket.generation,
                    "stale transform result dropped"
                );
                DispatchResult::unchanged()
            }
        }
    }

    /// Appends the computed result under the dialog's source node and shows
    /// it in a new tab.
    fn confirm_transform(&mut self) -> DispatchResult {
        let Some(dialog) = self.state.dialog.as_ref() else {
            self.report(SessionError::NoDialog);
            return DispatchResult::unchanged();
        };
        let (source, result) = match dialog.confirmable() {
            Ok((source, result)) => (source.clone(), result.clone()),
            Err(err) => {
                self.report(err);
                return DispatchResult::unchanged();
            }
        };
        let name = match dialog.name().trim() {
            "" => format!("{}-{}", source.name, dialog.kind.label()),
            name => name.to_string(),
        };

        let parent = if self.state.history.contains(source.node) {
            Some(source.node)
        } else {
            self.state.history.find_across_forest(source.tab)
        };
        let Some(parent) = parent else {
            self.report(HistoryError::NodeNotFound {
                target: NodeRef::Tab(source.tab),
            });
            return DispatchResult::unchanged();
        };

        let child = match self
            .state
            .history
            .append_child(parent, &name, result, source.path.clone())
        {
            Ok(child) => child,
            Err(err) => {
                self.report(err);
                return DispatchResult::unchanged();
            }
        };
        self.touch(source.path.clone());
        tracing::info!(path = %source.path.display(), name = %name, "transform confirmed");

        if let Err(err) = self.open_node_tab(child) {
            self.report(err);
        }
        self.pump_workspace();
        self.state.dialog = None;
        DispatchResult::changed(true)
    }

    fn resolve_source(&self, id: TabId) -> Option<DialogSource> {
        let node = self.state.history.find_across_forest(id)?;
        let entry = self.state.history.node(node)?;
        Some(DialogSource {
            tab: id,
            node,
            path: entry.source_path().map(Path::to_path_buf)?,
            name: entry.name().to_string(),
            artifact: entry.artifact().cloned()?,
        })
    }

    fn missing_tab(&mut self, id: TabId) -> DispatchResult {
        self.report(SessionError::UnknownTab(id));
        DispatchResult::unchanged()
    }

    fn with_dialog(&mut self, f: impl FnOnce(&mut TransformDialog) -> bool) -> DispatchResult {
        match self.state.dialog.as_mut() {
            Some(dialog) => DispatchResult::changed(f(dialog)),
            None => {
                self.report(SessionError::NoDialog);
                DispatchResult::unchanged()
            }
        }
    }
}
