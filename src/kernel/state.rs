use rustc_hash::{FxHashMap, FxHashSet};
use std::path::{Path, PathBuf};

use super::selection::SelectionState;
use super::services::ports::{DirNode, Settings};
use super::transform::TransformDialog;
use super::workspace::WorkspaceModel;
use crate::models::{HistoryForest, NodeKey};

#[derive(Debug, Default)]
pub struct ExplorerState {
    pub root: Option<PathBuf>,
    pub listing: Option<DirNode>,
    pub loading: bool,
}

#[derive(Debug)]
pub struct AppState {
    pub settings: Settings,
    pub workspace: WorkspaceModel,
    pub history: HistoryForest,
    pub selection: SelectionState,
    /// Per-path `Viewing(node)`. A path without an entry is unopened.
    pub viewing: FxHashMap<PathBuf, NodeKey>,
    pub dialog: Option<TransformDialog>,
    pub explorer: ExplorerState,
    pub pending_decodes: FxHashSet<PathBuf>,
    pub(crate) next_dialog_id: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let workspace = if settings.sidebar {
            WorkspaceModel::with_sidebar()
        } else {
            WorkspaceModel::new()
        };
        let history = HistoryForest::with_root_prefix(&settings.root_prefix);
        Self {
            settings,
            workspace,
            history,
            selection: SelectionState::default(),
            viewing: FxHashMap::default(),
            dialog: None,
            explorer: ExplorerState::default(),
            pending_decodes: FxHashSet::default(),
            next_dialog_id: 1,
        }
    }

    pub fn viewing(&self, path: &Path) -> Option<NodeKey> {
        self.viewing.get(path).copied()
    }

    /// History node behind the current selection.
    pub fn selected_node(&self) -> Option<NodeKey> {
        let selection = self.selection.get()?;
        self.history.find_across_forest(selection.tab)
    }
}
