use super::*;
use crate::kernel::services::ports::DirNode;
use crate::kernel::{CollaboratorError, Selection, SessionError, TabContent, WorkspaceEvent};
use crate::models::{ArtifactPayload, NodeKey, TabBinding, TabId, TransformKind};
use std::path::{Path, PathBuf};

fn bmp(path: &str, tag: u8) -> ArtifactPayload {
    let mut bytes = b"BM".to_vec();
    bytes.resize(16, tag);
    ArtifactPayload::new(bytes, path)
}

fn new_store() -> Store {
    Store::new(AppState::default())
}

fn open(store: &mut Store, path: &str) -> TabId {
    let result = store.dispatch(Action::OpenPath(PathBuf::from(path)));
    assert!(matches!(
        result.effects.as_slice(),
        [Effect::DecodeArtifact(p)] if p == Path::new(path)
    ));
    store.dispatch(Action::ArtifactDecoded {
        path: PathBuf::from(path),
        result: Ok(bmp(path, 1)),
    });
    store.state().selection.get().unwrap().tab
}

fn node_of(store: &Store, id: TabId) -> NodeKey {
    store.state().history.find_across_forest(id).unwrap()
}

fn messages(result: &DispatchResult) -> Vec<(MessageLevel, String)> {
    result
        .events
        .iter()
        .filter_map(|event| match event {
            CoreEvent::Message { level, text } => Some((*level, text.clone())),
            _ => None,
        })
        .collect()
}

/// Runs a transform of `kind` on the current selection up to a ready result.
fn compute(store: &mut Store, kind: TransformKind, output: ArtifactPayload) {
    store.dispatch(Action::OpenTransformDialog { kind });
    let result = store.dispatch(Action::ApplyTransform);
    let [Effect::RunTransform { ticket, .. }] = result.effects.as_slice() else {
        panic!("expected a transform request, got {:?}", result.effects);
    };
    store.dispatch(Action::TransformFinished {
        ticket: *ticket,
        result: Ok(output),
    });
}

#[test]
fn open_path_requests_decode_once() {
    let mut store = new_store();
    let first = store.dispatch(Action::OpenPath(PathBuf::from("/a.bmp")));
    assert_eq!(first.effects.len(), 1);

    let second = store.dispatch(Action::OpenPath(PathBuf::from("/a.bmp")));
    assert!(second.effects.is_empty());
    assert!(!second.state_changed);
}

#[test]
fn open_path_rejects_unsupported_extension() {
    let mut store = new_store();
    let result = store.dispatch(Action::OpenPath(PathBuf::from("/notes.txt")));

    assert!(result.effects.is_empty());
    assert_eq!(messages(&result)[0].0, MessageLevel::Warn);
    assert!(store.state().history.is_empty());
}

#[test]
fn decoded_artifact_creates_root_and_selects_first_child() {
    let mut store = new_store();
    store.dispatch(Action::OpenPath(PathBuf::from("/a.bmp")));
    let result = store.dispatch(Action::ArtifactDecoded {
        path: PathBuf::from("/a.bmp"),
        result: Ok(bmp("/a.bmp", 1)),
    });

    let state = store.state();
    let path = Path::new("/a.bmp");
    let child = state.history.first_child(path).unwrap();
    let tab = state.history.node(child).unwrap().binding().live().unwrap();
    assert_eq!(
        state.selection.get(),
        Some(&Selection {
            path: path.to_path_buf(),
            tab
        })
    );
    assert_eq!(state.viewing(path), Some(child));
    assert!(state.pending_decodes.is_empty());
    assert_eq!(state.workspace.tab(tab).unwrap().name, "(root)a.bmp");

    assert!(result
        .events
        .contains(&CoreEvent::SelectionChanged(state.selection.get().cloned())));
    assert_eq!(
        result.events.last(),
        Some(&CoreEvent::HistoryChanged {
            path: path.to_path_buf(),
            version: state.history.path_version(path),
        })
    );
}

#[test]
fn decode_failure_reports_without_touching_history() {
    let mut store = new_store();
    store.dispatch(Action::OpenPath(PathBuf::from("/a.bmp")));
    let result = store.dispatch(Action::ArtifactDecoded {
        path: PathBuf::from("/a.bmp"),
        result: Err(CollaboratorError::Decode {
            path: PathBuf::from("/a.bmp"),
            message: "truncated".to_string(),
        }),
    });

    assert!(store.state().history.is_empty());
    assert!(store.state().selection.get().is_none());
    assert_eq!(messages(&result).len(), 1);
    assert_eq!(messages(&result)[0].0, MessageLevel::Warn);

    let retry = store.dispatch(Action::OpenPath(PathBuf::from("/a.bmp")));
    assert_eq!(retry.effects.len(), 1);
}

#[test]
fn reopening_known_path_selects_existing_tab() {
    let mut store = new_store();
    let a = open(&mut store, "/a.bmp");
    let b = open(&mut store, "/b.bmp");
    assert_ne!(a, b);
    let opened = store.state().workspace.opened_count();

    let result = store.dispatch(Action::OpenPath(PathBuf::from("/a.bmp")));
    assert!(result.effects.is_empty());
    assert_eq!(store.state().selection.get().unwrap().tab, a);
    assert_eq!(store.state().workspace.opened_count(), opened);
}

#[test]
fn closing_tab_marks_node_stale_and_resyncs_selection() {
    let mut store = new_store();
    let a = open(&mut store, "/a.bmp");
    let b = open(&mut store, "/b.bmp");
    let b_node = node_of(&store, b);

    let result = store.dispatch(Action::WorkspaceCloseTab { id: b });

    let state = store.state();
    assert_eq!(state.history.node(b_node).unwrap().binding(), TabBinding::Stale(b));
    assert_eq!(state.history.find_across_forest(b), Some(b_node));
    assert_eq!(state.selection.get().unwrap().tab, a);

    let closed = result
        .events
        .iter()
        .position(|e| matches!(e, CoreEvent::Workspace(WorkspaceEvent::TabClosed { id, .. }) if *id == b))
        .unwrap();
    let reselected = result
        .events
        .iter()
        .position(|e| matches!(e, CoreEvent::SelectionChanged(_)))
        .unwrap();
    assert!(closed < reselected);
}

#[test]
fn closing_last_artifact_tab_clears_selection() {
    let mut store = new_store();
    let a = open(&mut store, "/a.bmp");

    let result = store.dispatch(Action::WorkspaceCloseTab { id: a });

    assert!(store.state().selection.get().is_none());
    assert!(result.events.contains(&CoreEvent::SelectionChanged(None)));
    assert_eq!(store.state().history.node_count(Path::new("/a.bmp")), 2);
}

#[test]
fn reselecting_stale_node_opens_exactly_one_tab() {
    let mut store = new_store();
    let a = open(&mut store, "/a.bmp");
    let node = node_of(&store, a);
    store.dispatch(Action::WorkspaceCloseTab { id: a });
    let opened = store.state().workspace.opened_count();

    store.dispatch(Action::HistorySelect { node });

    let state = store.state();
    assert_eq!(state.workspace.opened_count(), opened + 1);
    let fresh = state.history.node(node).unwrap().binding().live().unwrap();
    assert_ne!(fresh, a);
    assert_eq!(state.history.find_across_forest(a), None);
    assert_eq!(state.selection.get().unwrap().tab, fresh);
}

#[test]
fn reselecting_live_node_reuses_its_tab() {
    let mut store = new_store();
    let a = open(&mut store, "/a.bmp");
    let b = open(&mut store, "/b.bmp");
    let opened = store.state().workspace.opened_count();

    store.dispatch(Action::HistorySelectTab { id: a });

    assert_eq!(store.state().workspace.opened_count(), opened);
    assert_eq!(store.state().selection.get().unwrap().tab, a);
    assert!(store.state().workspace.contains(b));
}

#[test]
fn selecting_root_targets_its_first_child() {
    let mut store = new_store();
    let a = open(&mut store, "/a.bmp");
    open(&mut store, "/b.bmp");
    let root = store.state().history.root(Path::new("/a.bmp")).unwrap();

    store.dispatch(Action::HistorySelect { node: root });

    assert_eq!(store.state().selection.get().unwrap().tab, a);
}

#[test]
fn unknown_tab_reselect_warns() {
    let mut store = new_store();
    open(&mut store, "/a.bmp");

    let result = store.dispatch(Action::HistorySelectTab { id: TabId::new(99) });

    assert!(!result.state_changed);
    assert_eq!(
        messages(&result),
        vec![(
            MessageLevel::Warn,
            SessionError::UnknownTab(TabId::new(99)).to_string()
        )]
    );
}

#[test]
fn selecting_sidebar_tab_clears_selection() {
    let mut store = new_store();
    open(&mut store, "/a.bmp");
    let explorer = store.state().workspace.tabsets()[0].tabs[0].id;

    store.dispatch(Action::WorkspaceSelectTab { id: explorer });

    assert!(store.state().selection.get().is_none());
    assert_eq!(
        store.state().workspace.tab(explorer).unwrap().content,
        TabContent::Explorer
    );
}

#[test]
fn confirmed_transform_appends_child_and_selects_it() {
    let mut store = new_store();
    let a = open(&mut store, "/a.bmp");
    let parent = node_of(&store, a);
    compute(&mut store, TransformKind::ToGray, bmp("/a.bmp", 2));

    let result = store.dispatch(Action::ConfirmTransform);
    assert!(result.state_changed);

    let state = store.state();
    let children = state.history.node(parent).unwrap().children().to_vec();
    assert_eq!(children.len(), 1);
    let child = state.history.node(children[0]).unwrap();
    assert_eq!(child.name(), "(root)a.bmp-grayscale");
    let tab = child.binding().live().unwrap();
    assert_eq!(state.selection.get().unwrap().tab, tab);
    assert_eq!(state.viewing(Path::new("/a.bmp")), Some(children[0]));
    assert!(state.dialog.is_none());
}

#[test]
fn confirm_uses_edited_name() {
    let mut store = new_store();
    open(&mut store, "/a.bmp");
    compute(&mut store, TransformKind::Invert, bmp("/a.bmp", 3));
    store.dispatch(Action::SetTransformName("negative".to_string()));

    store.dispatch(Action::ConfirmTransform);

    let tab = store.state().selection.get().unwrap().tab;
    assert_eq!(store.state().workspace.tab(tab).unwrap().name, "negative");
}

#[test]
fn confirm_without_result_is_rejected() {
    let mut store = new_store();
    open(&mut store, "/a.bmp");
    store.dispatch(Action::OpenTransformDialog {
        kind: TransformKind::ToGray,
    });

    let result = store.dispatch(Action::ConfirmTransform);

    assert!(!result.state_changed);
    assert_eq!(messages(&result)[0].1, SessionError::NoResult.to_string());
    assert_eq!(store.state().history.node_count(Path::new("/a.bmp")), 2);
}

#[test]
fn closing_dialog_drops_late_result() {
    let mut store = new_store();
    let a = open(&mut store, "/a.bmp");
    store.dispatch(Action::OpenTransformDialog {
        kind: TransformKind::ToGray,
    });
    let applied = store.dispatch(Action::ApplyTransform);
    let [Effect::RunTransform { ticket, .. }] = applied.effects.as_slice() else {
        panic!("expected a transform request");
    };
    let ticket = *ticket;
    store.dispatch(Action::CloseTransformDialog);
    let version = store.state().history.version();

    let result = store.dispatch(Action::TransformFinished {
        ticket,
        result: Ok(bmp("/a.bmp", 9)),
    });

    assert!(!result.state_changed);
    assert!(result.events.is_empty());
    assert_eq!(store.state().history.version(), version);
    assert_eq!(store.state().selection.get().unwrap().tab, a);
}

#[test]
fn picking_source_brings_it_to_front() {
    let mut store = new_store();
    let a = open(&mut store, "/a.bmp");
    let first = node_of(&store, a);
    compute(&mut store, TransformKind::Invert, bmp("/a.bmp", 2));
    store.dispatch(Action::ConfirmTransform);
    let inverted_tab = store.state().selection.get().unwrap().tab;
    let inverted = node_of(&store, inverted_tab);

    store.dispatch(Action::OpenTransformDialog {
        kind: TransformKind::ToGray,
    });
    let picked = store.dispatch(Action::SetTransformSource { id: a });

    assert!(picked.state_changed);
    assert!(picked
        .events
        .iter()
        .any(|event| matches!(event, CoreEvent::SelectionChanged(Some(s)) if s.tab == a)));
    let state = store.state();
    assert_eq!(state.selection.get().unwrap().tab, a);
    assert_eq!(state.viewing(Path::new("/a.bmp")), Some(first));
    assert_eq!(state.dialog.as_ref().unwrap().source.as_ref().unwrap().node, first);

    let applied = store.dispatch(Action::ApplyTransform);
    let [Effect::RunTransform { ticket, .. }] = applied.effects.as_slice() else {
        panic!("expected a transform request");
    };
    let ticket = *ticket;
    store.dispatch(Action::TransformFinished {
        ticket,
        result: Ok(bmp("/a.bmp", 3)),
    });
    store.dispatch(Action::ConfirmTransform);

    let history = &store.state().history;
    assert_eq!(history.node(first).unwrap().children().len(), 2);
    assert!(history.node(inverted).unwrap().children().is_empty());
}

#[test]
fn picking_closed_source_reopens_it() {
    let mut store = new_store();
    let a = open(&mut store, "/a.bmp");
    let first = node_of(&store, a);
    compute(&mut store, TransformKind::Invert, bmp("/a.bmp", 2));
    store.dispatch(Action::ConfirmTransform);
    store.dispatch(Action::WorkspaceCloseTab { id: a });
    store.dispatch(Action::OpenTransformDialog {
        kind: TransformKind::ToGray,
    });
    let opened = store.state().workspace.opened_count();

    store.dispatch(Action::SetTransformSource { id: a });

    let state = store.state();
    assert_eq!(state.workspace.opened_count(), opened + 1);
    let TabBinding::Live(reopened) = state.history.node(first).unwrap().binding() else {
        panic!("source node should be live again");
    };
    assert_ne!(reopened, a);
    assert_eq!(state.selection.get().unwrap().tab, reopened);
    let source = state.dialog.as_ref().unwrap().source.as_ref().unwrap();
    assert_eq!((source.tab, source.node), (reopened, first));
}

#[test]
fn unknown_source_warns_and_keeps_dialog() {
    let mut store = new_store();
    let a = open(&mut store, "/a.bmp");
    store.dispatch(Action::OpenTransformDialog {
        kind: TransformKind::ToGray,
    });

    let result = store.dispatch(Action::SetTransformSource { id: TabId::new(99) });

    assert!(!result.state_changed);
    assert_eq!(messages(&result)[0].0, MessageLevel::Warn);
    assert_eq!(
        store.state().dialog.as_ref().unwrap().source.as_ref().unwrap().tab,
        a
    );
}

#[test]
fn changing_source_while_pending_drops_late_result() {
    let mut store = new_store();
    let a = open(&mut store, "/a.bmp");
    open(&mut store, "/b.bmp");
    store.dispatch(Action::OpenTransformDialog {
        kind: TransformKind::ToGray,
    });
    let applied = store.dispatch(Action::ApplyTransform);
    let [Effect::RunTransform { ticket, .. }] = applied.effects.as_slice() else {
        panic!("expected a transform request");
    };
    let ticket = *ticket;

    store.dispatch(Action::SetTransformSource { id: a });
    let late = store.dispatch(Action::TransformFinished {
        ticket,
        result: Ok(bmp("/b.bmp", 9)),
    });

    assert!(!late.state_changed);
    assert!(late.events.is_empty());
    let dialog = store.state().dialog.as_ref().unwrap();
    assert!(dialog.session.result().is_none());
    assert!(!dialog.session.is_pending());
    let confirm = store.dispatch(Action::ConfirmTransform);
    assert_eq!(messages(&confirm)[0].1, SessionError::NoResult.to_string());
}

#[test]
fn changing_secondary_while_pending_drops_late_result() {
    let mut store = new_store();
    let a = open(&mut store, "/a.bmp");
    let b = open(&mut store, "/b.bmp");
    let c = open(&mut store, "/c.bmp");
    store.dispatch(Action::OpenTransformDialog {
        kind: TransformKind::Add,
    });
    store.dispatch(Action::SetTransformSecondary { id: a });
    let applied = store.dispatch(Action::ApplyTransform);
    let [Effect::RunTransform { ticket, .. }] = applied.effects.as_slice() else {
        panic!("expected a transform request");
    };
    let ticket = *ticket;

    store.dispatch(Action::SetTransformSecondary { id: b });
    let late = store.dispatch(Action::TransformFinished {
        ticket,
        result: Ok(bmp("/c.bmp", 9)),
    });

    assert!(!late.state_changed);
    let dialog = store.state().dialog.as_ref().unwrap();
    assert!(dialog.session.result().is_none());
    assert_eq!(dialog.secondary.as_ref().unwrap().tab, b);
    assert_eq!(store.state().selection.get().unwrap().tab, c);
}

#[test]
fn apply_while_pending_is_busy() {
    let mut store = new_store();
    open(&mut store, "/a.bmp");
    store.dispatch(Action::OpenTransformDialog {
        kind: TransformKind::ToGray,
    });
    store.dispatch(Action::ApplyTransform);

    let result = store.dispatch(Action::ApplyTransform);

    assert!(result.effects.is_empty());
    assert_eq!(messages(&result)[0].1, SessionError::SessionBusy.to_string());
}

#[test]
fn binary_transform_needs_secondary_from_any_path() {
    let mut store = new_store();
    let a = open(&mut store, "/a.bmp");
    let b = open(&mut store, "/b.bmp");
    store.dispatch(Action::HistorySelectTab { id: a });
    store.dispatch(Action::OpenTransformDialog {
        kind: TransformKind::Add,
    });

    let missing = store.dispatch(Action::ApplyTransform);
    assert_eq!(
        messages(&missing)[0].1,
        SessionError::MissingSecondary.to_string()
    );

    store.dispatch(Action::SetTransformSecondary { id: b });
    let applied = store.dispatch(Action::ApplyTransform);
    let [Effect::RunTransform { request, .. }] = applied.effects.as_slice() else {
        panic!("expected a transform request");
    };
    assert_eq!(request.secondary.as_ref().unwrap().origin(), Path::new("/b.bmp"));
    assert_eq!(request.source.origin(), Path::new("/a.bmp"));
}

#[test]
fn args_for_argless_kind_are_ignored() {
    let mut store = new_store();
    open(&mut store, "/a.bmp");
    store.dispatch(Action::OpenTransformDialog {
        kind: TransformKind::ToGray,
    });

    let result = store.dispatch(Action::SetTransformArgs("0.5".to_string()));

    assert!(!result.state_changed);
    assert_eq!(messages(&result)[0].0, MessageLevel::Info);
    assert!(store.state().dialog.as_ref().unwrap().args.is_empty());
}

#[test]
fn engine_failure_keeps_dialog_open() {
    let mut store = new_store();
    open(&mut store, "/a.bmp");
    store.dispatch(Action::OpenTransformDialog {
        kind: TransformKind::Rotate,
    });
    store.dispatch(Action::SetTransformArgs("abc".to_string()));
    let applied = store.dispatch(Action::ApplyTransform);
    let [Effect::RunTransform { ticket, request }] = applied.effects.as_slice() else {
        panic!("expected a transform request");
    };
    assert_eq!(request.args, "abc");

    let result = store.dispatch(Action::TransformFinished {
        ticket: *ticket,
        result: Err(CollaboratorError::InvalidArgument("abc".to_string())),
    });

    assert_eq!(messages(&result)[0].0, MessageLevel::Warn);
    assert!(store.state().dialog.is_some());
    assert_eq!(store.state().history.node_count(Path::new("/a.bmp")), 2);
}

#[test]
fn dialog_actions_without_dialog_report_no_dialog() {
    let mut store = new_store();
    let result = store.dispatch(Action::ApplyTransform);
    assert_eq!(messages(&result)[0].1, SessionError::NoDialog.to_string());
}

#[test]
fn evict_closes_tabs_and_drops_history() {
    let mut store = new_store();
    let a = open(&mut store, "/a.bmp");
    compute(&mut store, TransformKind::Invert, bmp("/a.bmp", 4));
    store.dispatch(Action::ConfirmTransform);

    let result = store.dispatch(Action::EvictPath(PathBuf::from("/a.bmp")));

    let state = store.state();
    assert!(state.history.root(Path::new("/a.bmp")).is_none());
    assert!(state.workspace.tabs_for_path(Path::new("/a.bmp")).is_empty());
    assert!(!state.workspace.contains(a));
    assert!(state.viewing(Path::new("/a.bmp")).is_none());
    assert!(state.selection.get().is_none());
    assert_eq!(
        result.events.last(),
        Some(&CoreEvent::HistoryChanged {
            path: PathBuf::from("/a.bmp"),
            version: None,
        })
    );

    let reopen = store.dispatch(Action::OpenPath(PathBuf::from("/a.bmp")));
    assert_eq!(reopen.effects.len(), 1);
}

#[test]
fn evict_clears_dialog_inputs_from_that_path() {
    let mut store = new_store();
    let a = open(&mut store, "/a.bmp");
    let b = open(&mut store, "/b.bmp");
    store.dispatch(Action::OpenTransformDialog {
        kind: TransformKind::Add,
    });
    store.dispatch(Action::SetTransformSecondary { id: a });
    let applied = store.dispatch(Action::ApplyTransform);
    let [Effect::RunTransform { ticket, .. }] = applied.effects.as_slice() else {
        panic!("expected a transform request");
    };
    let ticket = *ticket;
    assert_eq!(
        store.state().dialog.as_ref().unwrap().source.as_ref().unwrap().tab,
        b
    );

    store.dispatch(Action::EvictPath(PathBuf::from("/b.bmp")));
    let dialog = store.state().dialog.as_ref().unwrap();
    assert!(dialog.source.is_none());
    assert_eq!(dialog.secondary.as_ref().unwrap().tab, a);

    let late = store.dispatch(Action::TransformFinished {
        ticket,
        result: Ok(bmp("/b.bmp", 9)),
    });
    assert!(!late.state_changed);
    assert!(store.state().history.root(Path::new("/b.bmp")).is_none());

    store.dispatch(Action::EvictPath(PathBuf::from("/a.bmp")));
    assert!(store.state().dialog.as_ref().unwrap().secondary.is_none());
}

#[test]
fn folder_listing_is_stored_for_current_root() {
    let mut store = new_store();
    let result = store.dispatch(Action::OpenFolder(PathBuf::from("/shots")));
    assert!(matches!(result.effects.as_slice(), [Effect::ListDirectory(_)]));
    assert!(store.state().explorer.loading);

    let stale = store.dispatch(Action::DirectoryListed {
        root: PathBuf::from("/elsewhere"),
        result: Err(CollaboratorError::Listing {
            path: PathBuf::from("/elsewhere"),
            message: "gone".to_string(),
        }),
    });
    assert!(!stale.state_changed);

    let listing = DirNode {
        name: "shots".to_string(),
        path: PathBuf::from("/shots"),
        is_container: true,
        children: Vec::new(),
    };
    store.dispatch(Action::DirectoryListed {
        root: PathBuf::from("/shots"),
        result: Ok(listing.clone()),
    });
    assert!(!store.state().explorer.loading);
    assert_eq!(store.state().explorer.listing, Some(listing));
}

#[test]
fn export_node_requests_write_of_its_artifact() {
    let mut store = new_store();
    let a = open(&mut store, "/a.bmp");
    let node = node_of(&store, a);

    let result = store.dispatch(Action::ExportNode {
        node,
        destination: PathBuf::from("/out/a.bmp"),
    });
    let [Effect::ExportArtifact {
        payload,
        destination,
    }] = result.effects.as_slice()
    else {
        panic!("expected an export request");
    };
    assert_eq!(destination, Path::new("/out/a.bmp"));
    assert_eq!(payload.origin(), Path::new("/a.bmp"));

    let root = store.state().history.root(Path::new("/a.bmp")).unwrap();
    let rejected = store.dispatch(Action::ExportNode {
        node: root,
        destination: PathBuf::from("/out/root.bmp"),
    });
    assert!(rejected.effects.is_empty());
    assert_eq!(messages(&rejected)[0].0, MessageLevel::Error);
}
