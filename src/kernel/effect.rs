use std::path::PathBuf;

use super::services::ports::TransformRequest;
use super::transform::TransformTicket;
use crate::models::ArtifactPayload;

/// Requests to external collaborators. Results come back as actions.
#[derive(Debug, Clone)]
pub enum Effect {
    ListDirectory(PathBuf),
    DecodeArtifact(PathBuf),
    RunTransform {
        ticket: TransformTicket,
        request: TransformRequest,
    },
    ExportArtifact {
        payload: ArtifactPayload,
        destination: PathBuf,
    },
}
