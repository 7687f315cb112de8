use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::errors::{PodcastError, PodcastResult};

pub const ARTIFACT_EXTENSION: &str = "feed";

/// Bytes of the digest shown in progress lines.
const PREFIX_BYTES: usize = 10;

/// Deterministic artifact name for a feed: the SHA-256 of its URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactKey {
    digest: [u8; 32],
}

impl ArtifactKey {
    pub fn for_url(url: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(url.as_bytes());
        Self {
            digest: hasher.finalize().into(),
        }
    }

    pub fn hex(&self) -> String {
        hex::encode(self.digest)
    }

    pub fn prefix_hex(&self) -> String {
        hex::encode(&self.digest[..PREFIX_BYTES])
    }

    pub fn file_name(&self) -> String {
        format!("{}.{}", self.hex(), ARTIFACT_EXTENSION)
    }
}

/// Directory shared by all workers during a run. Each worker owns exactly one
/// file in it, named by its [`ArtifactKey`].
#[derive(Debug, Clone)]
pub struct ScratchDir {
    root: PathBuf,
}

impl ScratchDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn ensure_exists(&self) -> PodcastResult<()> {
        fs::create_dir_all(&self.root).map_err(|source| self.directory_error(source))
    }

    pub fn artifact_path(&self, key: &ArtifactKey) -> PathBuf {
        self.root.join(key.file_name())
    }

    /// Write (or overwrite) an artifact, returning the number of bytes written.
    /// A failed write removes whatever partial file it left behind.
    pub fn write(&self, key: &ArtifactKey, text: &str) -> PodcastResult<usize> {
        let path = self.artifact_path(key);

        if let Err(source) = fs::write(&path, text) {
            let _ = fs::remove_file(&path);
            return Err(PodcastError::Write { path, source });
        }

        Ok(text.len())
    }

    /// Artifact files sorted by file name, so enumeration order is stable.
    pub fn list_artifacts(&self) -> PodcastResult<Vec<PathBuf>> {
        let entries = fs::read_dir(&self.root).map_err(|source| self.directory_error(source))?;

        let mut artifacts = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| self.directory_error(source))?;
            let path = entry.path();
            if path.is_file() && is_artifact(&path) {
                artifacts.push(path);
            }
        }
        artifacts.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        Ok(artifacts)
    }

    /// Delete every artifact, leaving other files alone. A missing directory
    /// has nothing to clear.
    pub fn clear(&self) -> PodcastResult<usize> {
        let artifacts = match self.list_artifacts() {
            Ok(artifacts) => artifacts,
            Err(PodcastError::Directory { source, .. }) if source.kind() == ErrorKind::NotFound => {
                return Ok(0)
            }
            Err(e) => return Err(e),
        };

        for path in &artifacts {
            fs::remove_file(path).map_err(|source| PodcastError::Directory {
                path: path.clone(),
                source,
            })?;
        }
        tracing::debug!(removed = artifacts.len(), dir = %self.root.display(), "cleared artifacts");

        Ok(artifacts.len())
    }

    fn directory_error(&self, source: std::io::Error) -> PodcastError {
        PodcastError::Directory {
            path: self.root.clone(),
            source,
        }
    }
}

fn is_artifact(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(ARTIFACT_EXTENSION)
}
