//! Local collaborators backed by the file system.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ignore::WalkBuilder;
use rustc_hash::FxHashMap;

use crate::kernel::error::CollaboratorError;
use crate::kernel::services::ports::{
    ArtifactDecoder, ArtifactExporter, BoxFuture, Collaborators, DirNode, DirectoryLister,
    TransformEngine, TransformRequest, DEFAULT_LISTING_DEPTH,
};
use crate::models::{ArtifactFormat, ArtifactPayload};

const IGNORED_NAMES: &[&str] = &[".git", "node_modules", "target", ".DS_Store"];

pub fn should_ignore(name: &str) -> bool {
    IGNORED_NAMES.contains(&name)
}

/// Walks a folder up to `max_depth` levels below the root. Hidden entries,
/// git-ignored paths and [`IGNORED_NAMES`] are left out.
pub struct LocalDirectoryLister {
    max_depth: usize,
}

impl LocalDirectoryLister {
    pub fn new(max_depth: usize) -> Self {
        Self {
            max_depth: max_depth.max(1),
        }
    }
}

impl Default for LocalDirectoryLister {
    fn default() -> Self {
        Self::new(DEFAULT_LISTING_DEPTH)
    }
}

impl DirectoryLister for LocalDirectoryLister {
    fn list(&self, path: PathBuf) -> BoxFuture<Result<DirNode, CollaboratorError>> {
        let max_depth = self.max_depth;
        Box::pin(async move {
            let path_for_error = path.clone();
            match tokio::task::spawn_blocking(move || walk(&path, max_depth)).await {
                Ok(result) => result,
                Err(e) => Err(CollaboratorError::Listing {
                    path: path_for_error,
                    message: e.to_string(),
                }),
            }
        })
    }
}

struct Entry {
    name: String,
    path: PathBuf,
    is_container: bool,
}

fn walk(root: &Path, max_depth: usize) -> Result<DirNode, CollaboratorError> {
    let listing_error = |message: String| CollaboratorError::Listing {
        path: root.to_path_buf(),
        message,
    };
    let metadata = std::fs::metadata(root).map_err(|e| listing_error(e.to_string()))?;
    if !metadata.is_dir() {
        return Err(listing_error("not a directory".to_string()));
    }

    let walker = WalkBuilder::new(root)
        .max_depth(Some(max_depth))
        .hidden(true)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .filter_entry(|entry| !should_ignore(&entry.file_name().to_string_lossy()))
        .build();

    let mut by_parent: FxHashMap<PathBuf, Vec<Entry>> = FxHashMap::default();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!(root = %root.display(), error = %e, "listing entry skipped");
                continue;
            }
        };
        if entry.depth() == 0 {
            continue;
        }
        let Some(parent) = entry.path().parent() else {
            continue;
        };
        by_parent
            .entry(parent.to_path_buf())
            .or_default()
            .push(Entry {
                name: entry.file_name().to_string_lossy().to_string(),
                path: entry.path().to_path_buf(),
                is_container: entry.file_type().is_some_and(|t| t.is_dir()),
            });
    }

    let name = root
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| root.display().to_string());
    Ok(DirNode {
        name,
        path: root.to_path_buf(),
        is_container: true,
        children: assemble(root, &mut by_parent),
    })
}

/// Directories first, then by name.
fn assemble(dir: &Path, by_parent: &mut FxHashMap<PathBuf, Vec<Entry>>) -> Vec<DirNode> {
    let mut nodes: Vec<DirNode> = by_parent
        .remove(dir)
        .unwrap_or_default()
        .into_iter()
        .map(|entry| {
            let children = if entry.is_container {
                assemble(&entry.path, by_parent)
            } else {
                Vec::new()
            };
            DirNode {
                name: entry.name,
                path: entry.path,
                is_container: entry.is_container,
                children,
            }
        })
        .collect();
    nodes.sort_by(|a, b| {
        b.is_container
            .cmp(&a.is_container)
            .then_with(|| a.name.cmp(&b.name))
    });
    nodes
}

pub struct LocalDecoder;

impl ArtifactDecoder for LocalDecoder {
    fn decode(&self, path: PathBuf) -> BoxFuture<Result<ArtifactPayload, CollaboratorError>> {
        Box::pin(async move {
            let bytes = match tokio::fs::read(&path).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    return Err(CollaboratorError::Decode {
                        path,
                        message: e.to_string(),
                    })
                }
            };
            if ArtifactFormat::sniff(&bytes).is_none() {
                return Err(CollaboratorError::Decode {
                    path,
                    message: "unrecognized image data".to_string(),
                });
            }
            Ok(ArtifactPayload::new(bytes, path))
        })
    }
}

pub struct LocalExporter;

impl ArtifactExporter for LocalExporter {
    fn export(
        &self,
        payload: ArtifactPayload,
        destination: PathBuf,
    ) -> BoxFuture<Result<(), CollaboratorError>> {
        Box::pin(async move {
            let write_error = |e: std::io::Error| CollaboratorError::Write {
                path: destination.clone(),
                message: e.to_string(),
            };
            if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent).await.map_err(write_error)?;
            }
            tokio::fs::write(&destination, payload.bytes())
                .await
                .map_err(write_error)
        })
    }
}

/// Stand-in for hosts without a transform engine.
pub struct UnavailableEngine;

impl TransformEngine for UnavailableEngine {
    fn run(&self, request: TransformRequest) -> BoxFuture<Result<ArtifactPayload, CollaboratorError>> {
        Box::pin(async move {
            Err(CollaboratorError::Engine(format!(
                "no transform engine configured for {}",
                request.kind
            )))
        })
    }
}

impl Collaborators {
    pub fn local() -> Self {
        Self {
            lister: Arc::new(LocalDirectoryLister::default()),
            decoder: Arc::new(LocalDecoder),
            engine: Arc::new(UnavailableEngine),
            exporter: Arc::new(LocalExporter),
        }
    }

    pub fn with_lister(mut self, lister: Arc<dyn DirectoryLister>) -> Self {
        self.lister = lister;
        self
    }

    pub fn with_engine(mut self, engine: Arc<dyn TransformEngine>) -> Self {
        self.engine = engine;
        self
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/local.rs"]
mod tests;
