//! The remembered-passphrase cache.
//!
//! This is the lower-trust store. When the user opts in, the passphrase is
//! written here in plaintext and is protected only by the storage medium
//! (file permissions for [`FilePassphraseCache`]). Keeping it behind its own
//! trait keeps that boundary separate from the encrypted [`RecordStore`].
//!
//! [`RecordStore`]: crate::store::RecordStore

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use foodchat_core::SecretString;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::error::Result;
use crate::store::{remove_file_if_exists, write_private_file};

/// Async trait for remembered-passphrase storage.
#[async_trait]
pub trait PassphraseCache: Send + Sync {
    /// The remembered passphrase, if any.
    async fn get(&self) -> Result<Option<SecretString>>;

    /// Remember `passphrase`, replacing any previous value.
    async fn set(&self, passphrase: &SecretString) -> Result<()>;

    /// Forget the remembered passphrase. Clearing nothing is not an error.
    async fn clear(&self) -> Result<()>;
}

/// Plaintext passphrase file with mode `0600` on Unix.
#[derive(Debug, Clone)]
pub struct FilePassphraseCache {
    path: PathBuf,
}

impl FilePassphraseCache {
    /// Create a cache backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a cache for the default passphrase file inside `data_dir`.
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(foodchat_core::paths::passphrase_file(data_dir))
    }

    /// Location of the passphrase file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl PassphraseCache for FilePassphraseCache {
    async fn get(&self) -> Result<Option<SecretString>> {
        let data = match tokio::fs::read_to_string(&self.path).await {
            Ok(data) => Zeroizing::new(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                // An unreadable cache means remember is off; `clear` still removes it.
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "ignoring unreadable passphrase file"
                );
                return Ok(None);
            }
        };

        // Tolerate a trailing newline from hand edits.
        let value = data.strip_suffix('\n').unwrap_or(&data);
        let value = value.strip_suffix('\r').unwrap_or(value);
        if value.is_empty() {
            return Ok(None);
        }
        Ok(Some(SecretString::new(value)))
    }

    async fn set(&self, passphrase: &SecretString) -> Result<()> {
        debug!(path = %self.path.display(), "remembering passphrase");
        write_private_file(&self.path, passphrase.expose_secret().as_bytes()).await
    }

    async fn clear(&self) -> Result<()> {
        debug!(path = %self.path.display(), "forgetting remembered passphrase");
        remove_file_if_exists(&self.path).await
    }
}

/// Volatile passphrase cache; nothing outlives the process.
#[derive(Debug, Default)]
pub struct MemoryPassphraseCache {
    value: Mutex<Option<SecretString>>,
}

impl MemoryPassphraseCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PassphraseCache for MemoryPassphraseCache {
    async fn get(&self) -> Result<Option<SecretString>> {
        Ok(self.value.lock().await.clone())
    }

    async fn set(&self, passphrase: &SecretString) -> Result<()> {
        *self.value.lock().await = Some(passphrase.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.value.lock().await.take();
        Ok(())
    }
}
