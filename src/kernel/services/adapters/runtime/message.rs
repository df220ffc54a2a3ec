use std::path::PathBuf;

use crate::kernel::error::CollaboratorError;
use crate::kernel::services::ports::DirNode;
use crate::kernel::transform::TransformTicket;
use crate::kernel::Action;
use crate::models::ArtifactPayload;

pub enum AppMessage {
    DirectoryListed {
        root: PathBuf,
        result: Result<DirNode, CollaboratorError>,
    },
    ArtifactDecoded {
        path: PathBuf,
        result: Result<ArtifactPayload, CollaboratorError>,
    },
    TransformFinished {
        ticket: TransformTicket,
        result: Result<ArtifactPayload, CollaboratorError>,
    },
    ExportFinished {
        destination: PathBuf,
        result: Result<(), CollaboratorError>,
    },
    /// A line typed by the user, posted by the host's input thread.
    Input(String),
    InputClosed,
}

impl AppMessage {
    /// Collaborator results map onto store actions; host input does not.
    pub fn into_action(self) -> Option<Action> {
        match self {
            AppMessage::DirectoryListed { root, result } => {
                Some(Action::DirectoryListed { root, result })
            }
            AppMessage::ArtifactDecoded { path, result } => {
                Some(Action::ArtifactDecoded { path, result })
            }
            AppMessage::TransformFinished { ticket, result } => {
                Some(Action::TransformFinished { ticket, result })
            }
            AppMessage::ExportFinished {
                destination,
                result,
            } => Some(Action::ExportFinished {
                destination,
                result,
            }),
            AppMessage::Input(_) | AppMessage::InputClosed => None,
        }
    }
}
