//! Artifact payloads: encoded image bytes plus the path they originate from.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ArtifactFormat {
    Bmp,
    Png,
    Jpeg,
    Gif,
}

impl ArtifactFormat {
    /// Identifies the encoding from the leading magic bytes.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.len() >= 14 && bytes.starts_with(b"BM") {
            return Some(Self::Bmp);
        }
        if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]) {
            return Some(Self::Png);
        }
        if bytes.starts_with(&[0xff, 0xd8, 0xff]) {
            return Some(Self::Jpeg);
        }
        if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
            return Some(Self::Gif);
        }
        None
    }
}

/// Immutable once produced; clones share the byte buffer.
#[derive(Clone, PartialEq, Eq)]
pub struct ArtifactPayload {
    bytes: Arc<[u8]>,
    origin: PathBuf,
}

impl ArtifactPayload {
    pub fn new(bytes: impl Into<Arc<[u8]>>, origin: impl Into<PathBuf>) -> Self {
        Self {
            bytes: bytes.into(),
            origin: origin.into(),
        }
    }

    /// A payload derived from this one: new bytes, same originating path.
    pub fn derive(&self, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            bytes: bytes.into(),
            origin: self.origin.clone(),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn origin(&self) -> &Path {
        &self.origin
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn format(&self) -> Option<ArtifactFormat> {
        ArtifactFormat::sniff(&self.bytes)
    }

    pub fn shares_bytes_with(&self, other: &ArtifactPayload) -> bool {
        Arc::ptr_eq(&self.bytes, &other.bytes)
    }
}

impl fmt::Debug for ArtifactPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArtifactPayload")
            .field("origin", &self.origin)
            .field("len", &self.bytes.len())
            .field("format", &self.format())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/artifact.rs"]
mod tests;
