use crate::kernel::{Action, Effect, HistoryError, MessageLevel};
use crate::models::NodeRef;

use super::DispatchResult;

impl super::Store {
    pub(super) fn reduce_explorer_action(&mut self, action: Action) -> DispatchResult {
        match action {
            Action::OpenFolder(root) => {
                self.state.explorer.root = Some(root.clone());
                self.state.explorer.listing = None;
                self.state.explorer.loading = true;
                DispatchResult {
                    effects: vec![Effect::ListDirectory(root)],
                    state_changed: true,
                    ..DispatchResult::default()
                }
            }
            Action::DirectoryListed { root, result } => {
                if self.state.explorer.root.as_ref() != Some(&root) {
                    tracing::debug!(path = %root.display(), "listing for a replaced folder dropped");
                    return DispatchResult::unchanged();
                }
                self.state.explorer.loading = false;
                match result {
                    Ok(listing) => {
                        tracing::debug!(
                            path = %root.display(),
                            entries = listing.children.len(),
                            "folder listed"
                        );
                        self.state.explorer.listing = Some(listing);
                    }
                    Err(err) => self.report(err),
                }
                DispatchResult::changed(true)
            }
            Action::ExportNode { node, destination } => {
                let Some(payload) = self
                    .state
                    .history
                    .node(node)
                    .and_then(|entry| entry.artifact())
                    .cloned()
                else {
                    self.report(HistoryError::NodeNotFound {
                        target: NodeRef::Key(node),
                    });
                    return DispatchResult::unchanged();
                };
                DispatchResult::effect(Effect::ExportArtifact {
                    payload,
                    destination,
                })
            }
            Action::ExportFinished {
                destination,
                result,
            } => {
                match result {
                    Ok(()) => {
                        tracing::info!(path = %destination.display(), "artifact exported");
                        self.message(
                            MessageLevel::Info,
                            format!("exported {}", destination.display()),
                        );
                    }
                    Err(err) => self.report(err),
                }
                DispatchResult::unchanged()
            }
            _ => DispatchResult::unchanged(),
        }
    }
}
