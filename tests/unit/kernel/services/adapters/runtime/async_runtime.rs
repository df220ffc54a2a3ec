use super::*;
use crate::kernel::error::CollaboratorError;
use crate::kernel::services::ports::{
    ArtifactDecoder, ArtifactExporter, BoxFuture, DirNode, DirectoryLister, TransformEngine,
};
use crate::kernel::Action;
use crate::models::TransformKind;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Default)]
struct Fake {
    engine_calls: AtomicUsize,
}

impl DirectoryLister for Fake {
    fn list(&self, path: PathBuf) -> BoxFuture<Result<DirNode, CollaboratorError>> {
        Box::pin(async move {
            Ok(DirNode {
                name: "shots".to_string(),
                path,
                is_container: true,
                children: Vec::new(),
            })
        })
    }
}

impl ArtifactDecoder for Fake {
    fn decode(&self, path: PathBuf) -> BoxFuture<Result<ArtifactPayload, CollaboratorError>> {
        Box::pin(async move { Ok(ArtifactPayload::new(b"BM------------".to_vec(), path)) })
    }
}

impl TransformEngine for Fake {
    fn run(&self, request: TransformRequest) -> BoxFuture<Result<ArtifactPayload, CollaboratorError>> {
        self.engine_calls.fetch_add(1, Ordering::SeqCst);
        Box::pin(async move { Ok(request.source.derive(b"BM--gray------".to_vec())) })
    }
}

impl ArtifactExporter for Fake {
    fn export(
        &self,
        _payload: ArtifactPayload,
        destination: PathBuf,
    ) -> BoxFuture<Result<(), CollaboratorError>> {
        Box::pin(async move {
            Err(CollaboratorError::Write {
                path: destination,
                message: "read-only".to_string(),
            })
        })
    }
}

fn runtime_with_fake() -> (AsyncRuntime, mpsc::Receiver<AppMessage>, Arc<Fake>) {
    let fake = Arc::new(Fake::default());
    let collaborators = Collaborators {
        lister: fake.clone(),
        decoder: fake.clone(),
        engine: fake.clone(),
        exporter: fake.clone(),
    };
    let (tx, rx) = mpsc::channel();
    let runtime = AsyncRuntime::new(tx, collaborators).unwrap();
    (runtime, rx, fake)
}

#[test]
fn decode_effect_posts_decoded_action() {
    let (runtime, rx, _) = runtime_with_fake();
    runtime.execute(Effect::DecodeArtifact(PathBuf::from("/a.bmp")));

    let action = rx.recv_timeout(TIMEOUT).unwrap().into_action().unwrap();
    let Action::ArtifactDecoded { path, result } = action else {
        panic!("unexpected action");
    };
    assert_eq!(path, PathBuf::from("/a.bmp"));
    assert_eq!(result.unwrap().origin(), Path::new("/a.bmp"));
}

#[test]
fn transform_effect_calls_engine_once_and_keeps_ticket() {
    let (runtime, rx, fake) = runtime_with_fake();
    let ticket = TransformTicket {
        dialog: 3,
        generation: 7,
    };
    runtime.execute(Effect::RunTransform {
        ticket,
        request: TransformRequest {
            source: ArtifactPayload::new(b"BM------------".to_vec(), "/a.bmp"),
            secondary: None,
            kind: TransformKind::ToGray,
            args: String::new(),
        },
    });

    let message = rx.recv_timeout(TIMEOUT).unwrap();
    let AppMessage::TransformFinished {
        ticket: finished,
        result,
    } = message
    else {
        panic!("unexpected message");
    };
    assert_eq!(finished, ticket);
    let payload = result.unwrap();
    assert_eq!(payload.bytes(), b"BM--gray------");
    assert_eq!(payload.origin(), Path::new("/a.bmp"));
    assert_eq!(fake.engine_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn export_failure_is_posted_back() {
    let (runtime, rx, _) = runtime_with_fake();
    runtime.execute(Effect::ExportArtifact {
        payload: ArtifactPayload::new(b"BM------------".to_vec(), "/a.bmp"),
        destination: PathBuf::from("/ro/a.bmp"),
    });

    let action = rx.recv_timeout(TIMEOUT).unwrap().into_action().unwrap();
    let Action::ExportFinished {
        destination,
        result,
    } = action
    else {
        panic!("unexpected action");
    };
    assert_eq!(destination, PathBuf::from("/ro/a.bmp"));
    assert!(matches!(result, Err(CollaboratorError::Write { .. })));
}

#[test]
fn listing_effect_posts_tree() {
    let (runtime, rx, _) = runtime_with_fake();
    runtime.execute(Effect::ListDirectory(PathBuf::from("/shots")));

    let message = rx.recv_timeout(TIMEOUT).unwrap();
    let AppMessage::DirectoryListed { root, result } = message else {
        panic!("unexpected message");
    };
    assert_eq!(root, PathBuf::from("/shots"));
    assert!(result.unwrap().is_container);
}

#[test]
fn host_input_maps_to_no_action() {
    assert!(AppMessage::Input("tabs".to_string()).into_action().is_none());
    assert!(AppMessage::InputClosed.into_action().is_none());
}
