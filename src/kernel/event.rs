//! Events the core exposes to the presentation layer.

use std::fmt;
use std::path::PathBuf;

use super::selection::Selection;
use super::workspace::WorkspaceEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Warn,
    Error,
}

impl fmt::Display for MessageLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MessageLevel::Info => "info",
            MessageLevel::Warn => "warn",
            MessageLevel::Error => "error",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreEvent {
    /// Emitted only when the value actually changes.
    SelectionChanged(Option<Selection>),
    /// `version` is `None` once the path's history was evicted.
    HistoryChanged {
        path: PathBuf,
        version: Option<u64>,
    },
    Workspace(WorkspaceEvent),
    Message {
        level: MessageLevel,
        text: String,
    },
}
