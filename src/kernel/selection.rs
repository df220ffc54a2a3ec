use std::path::PathBuf;

use super::workspace::{Tab, TabContent, WorkspaceModel};
use crate::models::TabId;

/// The artifact currently in front of the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub path: PathBuf,
    pub tab: TabId,
}

impl Selection {
    pub fn from_tab(tab: &Tab) -> Option<Self> {
        match &tab.content {
            TabContent::Artifact { path, .. } => Some(Self {
                path: path.clone(),
                tab: tab.id,
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct SelectionState {
    current: Option<Selection>,
}

impl SelectionState {
    pub fn get(&self) -> Option<&Selection> {
        self.current.as_ref()
    }

    /// Returns `true` when the value changed.
    pub fn set(&mut self, next: Option<Selection>) -> bool {
        if self.current == next {
            return false;
        }
        self.current = next;
        true
    }

    /// Mirrors the active tabset's selected tab if it shows an artifact;
    /// clears otherwise.
    pub fn resync(&mut self, workspace: &WorkspaceModel) -> bool {
        self.set(workspace.selected().and_then(Selection::from_tab))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/selection.rs"]
mod tests;
