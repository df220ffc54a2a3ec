use super::*;
use crate::models::ArtifactPayload;

#[test]
fn resync_follows_artifact_tab() {
    let mut ws = WorkspaceModel::new();
    let id = ws.open_tab(
        None,
        "a",
        TabContent::Artifact {
            path: PathBuf::from("/a.bmp"),
            payload: ArtifactPayload::new(b"BM".to_vec(), "/a.bmp"),
        },
    );
    let mut selection = SelectionState::default();

    assert!(selection.resync(&ws));
    assert_eq!(
        selection.get(),
        Some(&Selection {
            path: PathBuf::from("/a.bmp"),
            tab: id
        })
    );
    assert!(!selection.resync(&ws));
}

#[test]
fn resync_clears_on_non_artifact_tab() {
    let mut ws = WorkspaceModel::new();
    ws.open_tab(
        None,
        "a",
        TabContent::Artifact {
            path: PathBuf::from("/a.bmp"),
            payload: ArtifactPayload::new(b"BM".to_vec(), "/a.bmp"),
        },
    );
    let mut selection = SelectionState::default();
    selection.resync(&ws);

    ws.open_tab(None, "notes", TabContent::Text("hello".to_string()));

    assert!(selection.resync(&ws));
    assert!(selection.get().is_none());
}

#[test]
fn set_reports_change_only_on_difference() {
    let mut selection = SelectionState::default();
    assert!(!selection.set(None));
    let value = Selection {
        path: PathBuf::from("/a.bmp"),
        tab: TabId::new(3),
    };
    assert!(selection.set(Some(value.clone())));
    assert!(!selection.set(Some(value)));
}
