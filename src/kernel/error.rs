//! Error taxonomy of the synchronization core.
//!
//! Structural errors (`HistoryError`) mean the forest and the workspace have
//! diverged; they are always reported. Session and collaborator errors are
//! recoverable and never mutate state.

use std::path::PathBuf;
use thiserror::Error;

pub use crate::models::HistoryError;
use crate::models::TabId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("a transform is already running for this dialog")]
    SessionBusy,
    #[error("no source image selected")]
    NoSource,
    #[error("this transform needs a second image")]
    MissingSecondary,
    #[error("no transform result to confirm")]
    NoResult,
    #[error("no transform dialog is open")]
    NoDialog,
    /// A user-supplied tab id that no history node has ever been bound to.
    #[error("{0} shows no image history")]
    UnknownTab(TabId),
}

/// Failures reported by external collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollaboratorError {
    #[error("failed to decode {}: {message}", path.display())]
    Decode { path: PathBuf, message: String },
    #[error("invalid transform argument: {0}")]
    InvalidArgument(String),
    #[error("transform engine failed: {0}")]
    Engine(String),
    #[error("failed to write {}: {message}", path.display())]
    Write { path: PathBuf, message: String },
    #[error("failed to list {}: {message}", path.display())]
    Listing { path: PathBuf, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error(transparent)]
    History(#[from] HistoryError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),
}

impl CoreError {
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::History(_))
    }
}
