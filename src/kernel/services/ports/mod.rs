//! Service ports: traits + data contracts.

pub mod collaborators;
pub mod settings;

pub use collaborators::{
    ArtifactDecoder, ArtifactExporter, BoxFuture, Collaborators, DirNode, DirectoryLister,
    TransformEngine, TransformRequest,
};
pub use settings::{Settings, DEFAULT_LISTING_DEPTH};
