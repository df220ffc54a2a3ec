//! Data models: artifacts, the per-path history forest, the transform catalog.

pub mod artifact;
pub mod history;
pub mod ids;
pub mod transform_kind;

pub use artifact::{ArtifactFormat, ArtifactPayload};
pub use history::{
    HistoryEntry, HistoryError, HistoryForest, HistoryNode, HistoryRow, NodeKey, NodeRef,
    TabBinding, DEFAULT_ROOT_PREFIX,
};
pub use ids::{TabId, TabsetId};
pub use transform_kind::{TransformKind, UnknownTransform};
