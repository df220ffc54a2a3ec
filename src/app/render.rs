//! Plain-text views of the core state for the line-oriented host.

use crate::kernel::services::ports::{DirNode, Settings};
use crate::kernel::transform::{SessionState, TransformDialog};
use crate::kernel::workspace::{TabContent, WorkspaceEvent, WorkspaceModel};
use crate::kernel::{CoreEvent, Selection};
use crate::models::{HistoryForest, NodeKey, TabBinding, TransformKind};

/// Every path's history, rows numbered from 1 across the forest. The returned
/// keys are indexed by row number minus one.
pub fn render_tree(
    history: &HistoryForest,
    selection: Option<&Selection>,
) -> (Vec<String>, Vec<NodeKey>) {
    let mut lines = Vec::new();
    let mut keys = Vec::new();
    for path in history.paths() {
        lines.push(path.display().to_string());
        for row in history.rows(path) {
            keys.push(row.key);
            let marker = match (row.binding, selection) {
                (TabBinding::Live(id), Some(sel)) if sel.tab == id => "*",
                _ => " ",
            };
            let binding = match row.binding {
                TabBinding::Unbound => String::new(),
                TabBinding::Live(id) => format!(" [{id}]"),
                TabBinding::Stale(id) => format!(" ({id} closed)"),
            };
            lines.push(format!(
                "{:>3} {marker} {}{}{binding}",
                keys.len(),
                "  ".repeat(row.depth),
                row.name
            ));
        }
    }
    if lines.is_empty() {
        lines.push("no history".to_string());
    }
    (lines, keys)
}

/// Folders and the files the settings allow opening.
pub fn render_listing(listing: &DirNode, settings: &Settings) -> Vec<String> {
    let mut lines = vec![listing.path.display().to_string()];
    let mut stack: Vec<(&DirNode, usize)> = listing.children.iter().rev().map(|n| (n, 1)).collect();
    while let Some((node, depth)) = stack.pop() {
        if node.is_container {
            lines.push(format!("{}{}/", "  ".repeat(depth), node.name));
            stack.extend(node.children.iter().rev().map(|n| (n, depth + 1)));
        } else if settings.can_open(&node.path) {
            lines.push(format!("{}{}", "  ".repeat(depth), node.name));
        }
    }
    lines
}

pub fn render_tabs(workspace: &WorkspaceModel) -> Vec<String> {
    let mut lines = Vec::new();
    for set in workspace.tabsets() {
        let mut flags = Vec::new();
        if set.pinned {
            flags.push("pinned");
        }
        if set.id == workspace.active_tabset() {
            flags.push("active");
        }
        if flags.is_empty() {
            lines.push(set.id.to_string());
        } else {
            lines.push(format!("{} ({})", set.id, flags.join(", ")));
        }
        for tab in &set.tabs {
            let marker = if set.selected == Some(tab.id) { "*" } else { " " };
            let detail = match &tab.content {
                TabContent::Artifact { path, .. } => format!(" {}", path.display()),
                _ => String::new(),
            };
            lines.push(format!("  {marker} {} {}{detail}", tab.id, tab.name));
        }
    }
    lines
}

pub fn render_kinds() -> Vec<String> {
    TransformKind::ALL
        .iter()
        .map(|kind| match kind.arg_hint() {
            Some(hint) => format!("{:<28} {} ({hint})", kind.id(), kind.label()),
            None => format!("{:<28} {}", kind.id(), kind.label()),
        })
        .collect()
}

pub fn render_dialog(dialog: &TransformDialog) -> Vec<String> {
    let mut lines = vec![format!("transform {} ({})", dialog.kind.label(), dialog.kind)];
    match &dialog.source {
        Some(source) => lines.push(format!("  source     {} {}", source.tab, source.name)),
        None => lines.push("  source     none".to_string()),
    }
    if dialog.kind.needs_secondary() {
        match &dialog.secondary {
            Some(secondary) => lines.push(format!(
                "  secondary  {} {}",
                secondary.tab,
                secondary.artifact.origin().display()
            )),
            None => lines.push("  secondary  none".to_string()),
        }
    }
    if let Some(hint) = dialog.kind.arg_hint() {
        lines.push(format!("  args       {:?} ({hint})", dialog.args));
    }
    lines.push(format!("  name       {}", dialog.name()));
    let state = match dialog.session.state() {
        SessionState::Idle => "idle".to_string(),
        SessionState::Pending(_) => "running".to_string(),
        SessionState::Ready(payload) => format!("ready ({} bytes)", payload.len()),
        SessionState::Failed(err) => format!("failed: {err}"),
    };
    lines.push(format!("  state      {state}"));
    lines
}

/// One line per event worth showing; bookkeeping events render as nothing.
pub fn render_event(event: &CoreEvent) -> Option<String> {
    match event {
        CoreEvent::Message { level, text } => Some(format!("[{level}] {text}")),
        CoreEvent::SelectionChanged(Some(selection)) => Some(format!(
            "viewing {} in {}",
            selection.path.display(),
            selection.tab
        )),
        CoreEvent::SelectionChanged(None) => Some("no image selected".to_string()),
        CoreEvent::Workspace(WorkspaceEvent::TabAdded { id, tabset, .. }) => {
            Some(format!("opened {id} in {tabset}"))
        }
        CoreEvent::Workspace(WorkspaceEvent::TabClosed { id, .. }) => Some(format!("closed {id}")),
        CoreEvent::Workspace(_) | CoreEvent::HistoryChanged { .. } => None,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/app/render.rs"]
mod tests;
