use std::path::PathBuf;

use super::error::CollaboratorError;
use super::services::ports::DirNode;
use super::transform::TransformTicket;
use crate::models::{ArtifactPayload, NodeKey, TabId, TabsetId, TransformKind};

#[derive(Debug, Clone)]
pub enum Action {
    /// Explorer pick of a file.
    OpenPath(PathBuf),
    ArtifactDecoded {
        path: PathBuf,
        result: Result<ArtifactPayload, CollaboratorError>,
    },
    /// History view pick.
    HistorySelect {
        node: NodeKey,
    },
    HistorySelectTab {
        id: TabId,
    },
    WorkspaceSelectTab {
        id: TabId,
    },
    WorkspaceActivateTabset {
        tabset: TabsetId,
    },
    WorkspaceCloseTab {
        id: TabId,
    },
    /// Closes the path's tabs and discards its history.
    EvictPath(PathBuf),

    OpenTransformDialog {
        kind: TransformKind,
    },
    SetTransformSource {
        id: TabId,
    },
    SetTransformSecondary {
        id: TabId,
    },
    SetTransformArgs(String),
    SetTransformName(String),
    ApplyTransform,
    TransformFinished {
        ticket: TransformTicket,
        result: Result<ArtifactPayload, CollaboratorError>,
    },
    ConfirmTransform,
    CloseTransformDialog,

    OpenFolder(PathBuf),
    DirectoryListed {
        root: PathBuf,
        result: Result<DirNode, CollaboratorError>,
    },

    ExportNode {
        node: NodeKey,
        destination: PathBuf,
    },
    ExportFinished {
        destination: PathBuf,
        result: Result<(), CollaboratorError>,
    },
}
