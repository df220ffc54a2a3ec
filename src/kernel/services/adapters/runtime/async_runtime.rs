use std::io;
use std::path::PathBuf;
use std::sync::mpsc::Sender;

use super::message::AppMessage;
use crate::kernel::services::ports::{Collaborators, TransformRequest};
use crate::kernel::transform::TransformTicket;
use crate::kernel::Effect;
use crate::models::ArtifactPayload;

pub struct AsyncRuntime {
    runtime: tokio::runtime::Runtime,
    tx: Sender<AppMessage>,
    collaborators: Collaborators,
}

impl AsyncRuntime {
    pub fn new(tx: Sender<AppMessage>, collaborators: Collaborators) -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .or_else(|e| {
                tracing::error!(
                    error = %e,
                    "Failed to create multi-thread tokio runtime, falling back to current-thread"
                );
                tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
            })?;
        Ok(Self {
            runtime,
            tx,
            collaborators,
        })
    }

    pub fn execute(&self, effect: Effect) {
        match effect {
            Effect::ListDirectory(root) => self.list_directory(root),
            Effect::DecodeArtifact(path) => self.decode_artifact(path),
            Effect::RunTransform { ticket, request } => self.run_transform(ticket, request),
            Effect::ExportArtifact {
                payload,
                destination,
            } => self.export_artifact(payload, destination),
        }
    }

    pub fn list_directory(&self, root: PathBuf) {
        let tx = self.tx.clone();
        let lister = self.collaborators.lister.clone();
        self.runtime.spawn(async move {
            let result = lister.list(root.clone()).await;
            if let Err(e) = &result {
                tracing::warn!(path = %root.display(), error = %e, "directory listing failed");
            }
            let _ = tx.send(AppMessage::DirectoryListed { root, result });
        });
    }

    pub fn decode_artifact(&self, path: PathBuf) {
        let tx = self.tx.clone();
        let decoder = self.collaborators.decoder.clone();
        self.runtime.spawn(async move {
            let result = decoder.decode(path.clone()).await;
            let _ = tx.send(AppMessage::ArtifactDecoded { path, result });
        });
    }

    /// Exactly one engine call per request.
    pub fn run_transform(&self, ticket: TransformTicket, request: TransformRequest) {
        let tx = self.tx.clone();
        let engine = self.collaborators.engine.clone();
        self.runtime.spawn(async move {
            tracing::debug!(
                kind = %request.kind,
                generation = ticket.generation,
                "transform started"
            );
            let result = engine.run(request).await;
            let _ = tx.send(AppMessage::TransformFinished { ticket, result });
        });
    }

    pub fn export_artifact(&self, payload: ArtifactPayload, destination: PathBuf) {
        let tx = self.tx.clone();
        let exporter = self.collaborators.exporter.clone();
        self.runtime.spawn(async move {
            let result = exporter.export(payload, destination.clone()).await;
            let _ = tx.send(AppMessage::ExportFinished {
                destination,
                result,
            });
        });
    }
}

#[cfg(test)]
#[path = "../../../../../tests/unit/kernel/services/adapters/runtime/async_runtime.rs"]
mod tests;
