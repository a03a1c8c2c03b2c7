//! Upload directory: unique-name writes and by-name reads.
//!
//! Collisions are avoided by naming every file with a fresh v4 UUID, never by
//! locking. Nothing here deletes files.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::StoredAsset;

/// Name of the upload directory under the asset root. Also the URL prefix the
/// HTML photo slot uses.
pub const UPLOAD_SUBDIR: &str = "uploads";

#[derive(Debug, Clone)]
pub struct AssetStore {
    dir: PathBuf,
}

impl AssetStore {
    /// Opens the store, creating the directory if needed.
    pub async fn open(dir: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes `bytes` under a new unique name ending in `.{extension}`.
    pub async fn persist(&self, extension: &str, bytes: &[u8]) -> Result<StoredAsset, AppError> {
        let name = format!("{}.{extension}", Uuid::new_v4().simple());
        let path = self.dir.join(&name);

        tokio::fs::write(&path, bytes)
            .await
            .map_err(|source| AppError::StorageFailure {
                path: path.clone(),
                source,
            })?;

        debug!("Persisted {} bytes to {}", bytes.len(), path.display());
        Ok(StoredAsset { name, path })
    }

    /// Reads a previously persisted file by its bare name.
    pub async fn read(&self, name: &str) -> Result<Bytes, AppError> {
        if !is_bare_file_name(name) {
            return Err(AppError::NotFound(format!("Asset {name} not found")));
        }

        let path = self.dir.join(name);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Bytes::from(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AppError::NotFound(format!("Asset {name} not found")))
            }
            Err(source) => Err(AppError::StorageFailure { path, source }),
        }
    }
}

fn is_bare_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && !name.contains('\0')
}
