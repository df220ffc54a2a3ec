//! Tab workspace: ordered tabsets holding tabs.
//!
//! The model owns tab identity. Every mutation queues [`WorkspaceEvent`]s that
//! the controller drains after issuing a command; a watched tab's `TabClosed`
//! is always queued before the selection changes its removal causes.

use compact_str::CompactString;
use rustc_hash::FxHashSet;
use std::path::{Path, PathBuf};

use crate::models::{ArtifactPayload, TabId, TabsetId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabKind {
    Artifact,
    Explorer,
    History,
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabContent {
    Artifact {
        path: PathBuf,
        payload: ArtifactPayload,
    },
    Explorer,
    History,
    Text(String),
}

impl TabContent {
    pub fn kind(&self) -> TabKind {
        match self {
            Self::Artifact { .. } => TabKind::Artifact,
            Self::Explorer => TabKind::Explorer,
            Self::History => TabKind::History,
            Self::Text(_) => TabKind::Text,
        }
    }

    pub fn artifact_path(&self) -> Option<&Path> {
        match self {
            Self::Artifact { path, .. } => Some(path),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Tab {
    pub id: TabId,
    pub name: CompactString,
    pub content: TabContent,
}

#[derive(Debug)]
pub struct Tabset {
    pub id: TabsetId,
    pub tabs: Vec<Tab>,
    pub selected: Option<TabId>,
    /// Pinned tabsets only receive tabs opened with an explicit hint.
    pub pinned: bool,
}

impl Tabset {
    fn new(id: TabsetId, pinned: bool) -> Self {
        Self {
            id,
            tabs: Vec::new(),
            selected: None,
            pinned,
        }
    }

    fn index_of(&self, id: TabId) -> Option<usize> {
        self.tabs.iter().position(|tab| tab.id == id)
    }

    pub fn selected_tab(&self) -> Option<&Tab> {
        let id = self.selected?;
        self.tabs.iter().find(|tab| tab.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkspaceEvent {
    TabAdded {
        id: TabId,
        tabset: TabsetId,
        kind: TabKind,
        config: TabContent,
    },
    TabSelected {
        id: TabId,
    },
    ActiveContainerChanged {
        tabset: TabsetId,
        selected: Option<TabId>,
    },
    TabClosed {
        id: TabId,
        content: TabContent,
    },
}

#[derive(Debug)]
pub struct WorkspaceModel {
    tabsets: Vec<Tabset>,
    active: TabsetId,
    close_watch: FxHashSet<TabId>,
    events: Vec<WorkspaceEvent>,
    next_tab_id: u64,
    next_tabset_id: u64,
    opened: u64,
}

impl Default for WorkspaceModel {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkspaceModel {
    /// A single empty main tabset.
    pub fn new() -> Self {
        let main = TabsetId::new(1);
        Self {
            tabsets: vec![Tabset::new(main, false)],
            active: main,
            close_watch: FxHashSet::default(),
            events: Vec::new(),
            next_tab_id: 1,
            next_tabset_id: 2,
            opened: 0,
        }
    }

    /// A pinned sidebar with the explorer and history tabs, followed by the
    /// main tabset, which starts active.
    pub fn with_sidebar() -> Self {
        let mut workspace = Self::new();
        let main = workspace.active;
        let sidebar = workspace.add_tabset(true);
        workspace.tabsets.rotate_right(1);
        workspace.open_tab(Some(sidebar), "Explorer", TabContent::Explorer);
        workspace.open_tab(Some(sidebar), "History", TabContent::History);
        if let Some(set) = workspace.tabset_mut(sidebar) {
            set.selected = set.tabs.first().map(|tab| tab.id);
        }
        workspace.active = main;
        workspace.events.clear();
        workspace
    }

    pub fn add_tabset(&mut self, pinned: bool) -> TabsetId {
        let id = TabsetId::new(self.next_tabset_id);
        self.next_tabset_id = self.next_tabset_id.saturating_add(1);
        self.tabsets.push(Tabset::new(id, pinned));
        id
    }

    pub fn tabsets(&self) -> &[Tabset] {
        &self.tabsets
    }

    pub fn active_tabset(&self) -> TabsetId {
        self.active
    }

    /// Number of tabs ever opened.
    pub fn opened_count(&self) -> u64 {
        self.opened
    }

    pub fn contains(&self, id: TabId) -> bool {
        self.tab(id).is_some()
    }

    pub fn tab(&self, id: TabId) -> Option<&Tab> {
        self.tabsets
            .iter()
            .flat_map(|set| set.tabs.iter())
            .find(|tab| tab.id == id)
    }

    pub fn tabset_of(&self, id: TabId) -> Option<TabsetId> {
        self.tabsets
            .iter()
            .find(|set| set.index_of(id).is_some())
            .map(|set| set.id)
    }

    /// The active tabset's selected tab.
    pub fn selected(&self) -> Option<&Tab> {
        self.tabset(self.active)?.selected_tab()
    }

    pub fn tabs_for_path(&self, path: &Path) -> Vec<TabId> {
        self.tabsets
            .iter()
            .flat_map(|set| set.tabs.iter())
            .filter(|tab| tab.content.artifact_path() == Some(path))
            .map(|tab| tab.id)
            .collect()
    }

    /// Opens a tab in `hint`, or in the default tabset when the hint is absent
    /// or unknown. The new tab becomes selected and its tabset active.
    pub fn open_tab(
        &mut self,
        hint: Option<TabsetId>,
        name: &str,
        content: TabContent,
    ) -> TabId {
        let target = match hint.filter(|id| self.tabset(*id).is_some()) {
            Some(id) => id,
            None => self.default_target(),
        };

        let id = TabId::new(self.next_tab_id);
        self.next_tab_id = self.next_tab_id.saturating_add(1);
        self.opened = self.opened.saturating_add(1);

        let kind = content.kind();
        let config = content.clone();
        if let Some(set) = self.tabset_mut(target) {
            set.tabs.push(Tab {
                id,
                name: CompactString::new(name),
                content,
            });
            set.selected = Some(id);
        }
        tracing::debug!(tab = id.raw(), tabset = target.raw(), ?kind, "tab opened");

        self.events.push(WorkspaceEvent::TabAdded {
            id,
            tabset: target,
            kind,
            config,
        });
        self.events.push(WorkspaceEvent::TabSelected { id });
        self.set_active(target);
        id
    }

    /// Selects `id` within its tabset and activates that tabset. Unknown ids
    /// are ignored.
    pub fn select_tab(&mut self, id: TabId) -> bool {
        let Some(target) = self.tabset_of(id) else {
            return false;
        };
        let mut changed = false;
        if let Some(set) = self.tabset_mut(target) {
            if set.selected != Some(id) {
                set.selected = Some(id);
                changed = true;
            }
        }
        if changed {
            self.events.push(WorkspaceEvent::TabSelected { id });
        }
        self.set_active(target) || changed
    }

    pub fn activate_tabset(&mut self, id: TabsetId) -> bool {
        if self.tabset(id).is_none() {
            return false;
        }
        self.set_active(id)
    }

    /// One-shot close notification for `id`.
    pub fn on_close(&mut self, id: TabId) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.close_watch.insert(id)
    }

    /// Closes a tab as the user would. A neighbour takes over the selection;
    /// if the active tabset empties, the first tabset with a selection
    /// becomes active.
    pub fn close_tab(&mut self, id: TabId) -> Option<Tab> {
        let target = self.tabset_of(id)?;
        let set = self.tabset_mut(target)?;
        let index = set.index_of(id)?;
        let tab = set.tabs.remove(index);
        let was_selected = set.selected == Some(id);
        let mut reselected = None;
        if was_selected {
            set.selected = set
                .tabs
                .get(index)
                .or_else(|| set.tabs.last())
                .map(|tab| tab.id);
            reselected = set.selected;
        }
        let emptied = set.tabs.is_empty();

        if self.close_watch.remove(&id) {
            self.events.push(WorkspaceEvent::TabClosed {
                id,
                content: tab.content.clone(),
            });
        }
        tracing::debug!(tab = id.raw(), tabset = target.raw(), "tab closed");

        if let Some(next) = reselected {
            self.events.push(WorkspaceEvent::TabSelected { id: next });
        }

        if emptied && self.active == target {
            let fallback = self
                .tabsets
                .iter()
                .find(|set| set.selected.is_some() && !set.pinned)
                .or_else(|| self.tabsets.iter().find(|set| set.selected.is_some()))
                .map(|set| set.id);
            if let Some(fallback) = fallback {
                self.set_active(fallback);
            } else {
                self.events.push(WorkspaceEvent::ActiveContainerChanged {
                    tabset: target,
                    selected: None,
                });
            }
        }

        Some(tab)
    }

    pub fn drain_events(&mut self) -> Vec<WorkspaceEvent> {
        std::mem::take(&mut self.events)
    }

    fn tabset(&self, id: TabsetId) -> Option<&Tabset> {
        self.tabsets.iter().find(|set| set.id == id)
    }

    fn tabset_mut(&mut self, id: TabsetId) -> Option<&mut Tabset> {
        self.tabsets.iter_mut().find(|set| set.id == id)
    }

    fn default_target(&mut self) -> TabsetId {
        if self.tabset(self.active).is_some_and(|set| !set.pinned) {
            return self.active;
        }
        if let Some(set) = self.tabsets.iter().find(|set| !set.pinned) {
            return set.id;
        }
        self.add_tabset(false)
    }

    fn set_active(&mut self, id: TabsetId) -> bool {
        if self.active == id {
            return false;
        }
        self.active = id;
        let selected = self.tabset(id).and_then(|set| set.selected);
        self.events
            .push(WorkspaceEvent::ActiveContainerChanged { tabset: id, selected });
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/workspace.rs"]
mod tests;
