//! External collaborators the core issues requests to.
//!
//! Every call is asynchronous and returns new data; none of them touch kernel
//! state. Results flow back to the store as actions.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;

use crate::kernel::error::CollaboratorError;
use crate::models::{ArtifactPayload, TransformKind};

pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirNode {
    pub name: String,
    pub path: PathBuf,
    pub is_container: bool,
    pub children: Vec<DirNode>,
}

impl DirNode {
    /// Depth-first lookup by name path relative to this node.
    pub fn find(&self, names: &[&str]) -> Option<&DirNode> {
        let Some((first, rest)) = names.split_first() else {
            return Some(self);
        };
        self.children
            .iter()
            .find(|child| child.name == *first)
            .and_then(|child| child.find(rest))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformRequest {
    pub source: ArtifactPayload,
    pub secondary: Option<ArtifactPayload>,
    pub kind: TransformKind,
    /// Free-form, validated only by the engine.
    pub args: String,
}

pub trait DirectoryLister: Send + Sync {
    fn list(&self, path: PathBuf) -> BoxFuture<Result<DirNode, CollaboratorError>>;
}

pub trait ArtifactDecoder: Send + Sync {
    fn decode(&self, path: PathBuf) -> BoxFuture<Result<ArtifactPayload, CollaboratorError>>;
}

pub trait TransformEngine: Send + Sync {
    fn run(&self, request: TransformRequest) -> BoxFuture<Result<ArtifactPayload, CollaboratorError>>;
}

pub trait ArtifactExporter: Send + Sync {
    fn export(
        &self,
        payload: ArtifactPayload,
        destination: PathBuf,
    ) -> BoxFuture<Result<(), CollaboratorError>>;
}

#[derive(Clone)]
pub struct Collaborators {
    pub lister: Arc<dyn DirectoryLister>,
    pub decoder: Arc<dyn ArtifactDecoder>,
    pub engine: Arc<dyn TransformEngine>,
    pub exporter: Arc<dyn ArtifactExporter>,
}
