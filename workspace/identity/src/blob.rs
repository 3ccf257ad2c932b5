//! Blob storage for uploaded files, addressed by relative `/`-separated paths.

use std::io;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::error::Result;

/// Opaque store the avatar bytes are written to.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores `bytes` under `path`, replacing any previous content.
    async fn put(&self, path: &str, bytes: &[u8]) -> Result<()>;

    /// Removes the blob at `path`. Removing a missing blob is not an error.
    async fn delete(&self, path: &str) -> Result<()>;
}

/// Blob store backed by a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps a store path onto the filesystem below the root.
    /// Absolute paths and `..` components are rejected.
    pub fn resolve(&self, path: &str) -> io::Result<PathBuf> {
        let relative = Path::new(path);
        let mut resolved = self.root.clone();
        for component in relative.components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                _ => {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidInput,
                        format!("blob path '{}' escapes the store root", path),
                    ));
                }
            }
        }
        Ok(resolved)
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    async fn put(&self, path: &str, bytes: &[u8]) -> Result<()> {
        let target = self.resolve(path)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&target, bytes).await?;
        debug!(target = %target.display(), "Blob written");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, path: &str) -> Result<()> {
        let target = self.resolve(path)?;
        match tokio::fs::remove_file(&target).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
