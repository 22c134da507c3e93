//! Persistence for the encrypted record.
//!
//! Defines the [`RecordStore`] trait and provides [`FileRecordStore`], which
//! keeps the record as a single JSON file, and [`MemoryRecordStore`] for
//! ephemeral sessions and tests.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{Result, VaultError};
use crate::record::EncryptedRecord;

/// Async trait for encrypted record storage backends.
///
/// Every mutation replaces the whole record; there are no partial updates.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Load the stored record.
    ///
    /// Returns `Ok(None)` when nothing is stored and
    /// [`VaultError::MalformedRecord`] when something is stored but unusable.
    async fn load(&self) -> Result<Option<EncryptedRecord>>;

    /// Replace the stored record.
    async fn save(&self, record: &EncryptedRecord) -> Result<()>;

    /// Remove the stored record. Removing nothing is not an error.
    async fn remove(&self) -> Result<()>;
}

/// A file-system-backed record store.
///
/// The record lives at a single path and is replaced through a temporary file
/// and a rename, so readers never observe a half-written record. Files are
/// created with mode `0600` on Unix.
#[derive(Debug, Clone)]
pub struct FileRecordStore {
    path: PathBuf,
}

impl FileRecordStore {
    /// Create a store for the record at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a store for the default record file inside `data_dir`.
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(foodchat_core::paths::record_file(data_dir))
    }

    /// Location of the record file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Write `data` to `path` atomically, restricted to the owner on Unix.
pub(crate) async fn write_private_file(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            let parent = parent.to_path_buf();
            tokio::task::spawn_blocking(move || foodchat_core::paths::ensure_private_dir(&parent))
                .await
                .map_err(|e| VaultError::Storage(format!("directory task failed: {e}")))?
                .map_err(|e| VaultError::Storage(e.to_string()))?;
        }
    }

    let mut temp = path.as_os_str().to_owned();
    temp.push(".tmp");
    let temp = PathBuf::from(temp);

    // A leftover temp file may carry wider permissions; start from scratch.
    remove_file_if_exists(&temp).await?;

    let result = match create_private_file(&temp, data).await {
        Ok(()) => tokio::fs::rename(&temp, path).await,
        Err(e) => Err(e),
    };
    if let Err(e) = result {
        if let Err(cleanup) = tokio::fs::remove_file(&temp).await {
            debug!(path = %temp.display(), error = %cleanup, "failed to remove temp file");
        }
        return Err(e.into());
    }
    Ok(())
}

/// Create a new file that is owner-only on Unix from the moment it exists.
async fn create_private_file(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options.open(path).await?;
    file.write_all(data).await?;
    file.sync_all().await
}

/// Remove `path`, treating a missing file as success.
pub(crate) async fn remove_file_if_exists(path: &Path) -> Result<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

#[async_trait]
impl RecordStore for FileRecordStore {
    async fn load(&self) -> Result<Option<EncryptedRecord>> {
        let data = match tokio::fs::read_to_string(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                return Err(VaultError::MalformedRecord(
                    "record file is not valid UTF-8".to_string(),
                ))
            }
            Err(e) => return Err(e.into()),
        };

        if data.trim().is_empty() {
            return Ok(None);
        }

        EncryptedRecord::from_json(&data).map(Some)
    }

    async fn save(&self, record: &EncryptedRecord) -> Result<()> {
        let json = record.to_json()?;
        debug!(path = %self.path.display(), "writing encrypted record");
        write_private_file(&self.path, json.as_bytes()).await
    }

    async fn remove(&self) -> Result<()> {
        debug!(path = %self.path.display(), "removing encrypted record");
        remove_file_if_exists(&self.path).await
    }
}

/// An in-memory record store.
///
/// Holds the raw JSON text rather than the decoded record, so a damaged
/// document behaves exactly as it would on disk.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    raw: Mutex<Option<String>>,
}

impl MemoryRecordStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-filled with raw JSON text.
    pub fn with_raw(json: impl Into<String>) -> Self {
        Self {
            raw: Mutex::new(Some(json.into())),
        }
    }

    /// The raw stored text, if any.
    pub async fn raw(&self) -> Option<String> {
        self.raw.lock().await.clone()
    }

    /// Overwrite the raw stored text.
    pub async fn set_raw(&self, json: impl Into<String>) {
        *self.raw.lock().await = Some(json.into());
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn load(&self) -> Result<Option<EncryptedRecord>> {
        match self.raw.lock().await.as_deref() {
            Some(json) if !json.trim().is_empty() => EncryptedRecord::from_json(json).map(Some),
            _ => Ok(None),
        }
    }

    async fn save(&self, record: &EncryptedRecord) -> Result<()> {
        let json = record.to_json()?;
        *self.raw.lock().await = Some(json);
        Ok(())
    }

    async fn remove(&self) -> Result<()> {
        self.raw.lock().await.take();
        Ok(())
    }
}
