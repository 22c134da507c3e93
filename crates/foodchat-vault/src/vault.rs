//! The credential vault: store, unlock and forget one encrypted API key.

use std::sync::Arc;

use foodchat_core::config::{
    DEFAULT_KDF_ITERATIONS, MAX_KDF_ITERATIONS, MIN_KDF_ITERATIONS,
};
use foodchat_core::SecretString;
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::crypto::{decrypt_record, encrypt_secret, CryptoProvider, SystemCrypto};
use crate::error::{Result, VaultError};
use crate::record::{EncryptedRecord, KEY_LEN, SALT_LEN};
use crate::store::RecordStore;

/// Encrypts the API key under a passphrase and persists it through a
/// [`RecordStore`].
///
/// Key derivation and cipher work run on the blocking thread pool, so callers
/// on the async runtime are suspended rather than stalled.
#[derive(Clone)]
pub struct CredentialVault {
    provider: Arc<dyn CryptoProvider>,
    records: Arc<dyn RecordStore>,
    iterations: u32,
}

impl std::fmt::Debug for CredentialVault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialVault")
            .field("iterations", &self.iterations)
            .finish_non_exhaustive()
    }
}

impl CredentialVault {
    /// Create a vault using [`SystemCrypto`] and the default iteration count.
    pub fn new(records: Arc<dyn RecordStore>) -> Self {
        Self::with_provider(Arc::new(SystemCrypto), records)
    }

    /// Create a vault with an explicit crypto provider.
    pub fn with_provider(provider: Arc<dyn CryptoProvider>, records: Arc<dyn RecordStore>) -> Self {
        Self {
            provider,
            records,
            iterations: DEFAULT_KDF_ITERATIONS,
        }
    }

    /// Use `iterations` PBKDF2 rounds for newly stored records.
    ///
    /// Existing records keep the count they were written with.
    pub fn with_iterations(mut self, iterations: u32) -> Result<Self> {
        if iterations < MIN_KDF_ITERATIONS {
            return Err(VaultError::Encryption(format!(
                "iteration count {iterations} is below the minimum of {MIN_KDF_ITERATIONS}"
            )));
        }
        if iterations > MAX_KDF_ITERATIONS {
            return Err(VaultError::Encryption(format!(
                "iteration count {iterations} is above the maximum of {MAX_KDF_ITERATIONS}"
            )));
        }
        self.iterations = iterations;
        Ok(self)
    }

    /// PBKDF2 rounds used for new records.
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Derive the symmetric key for `passphrase` and `salt` with the vault's
    /// iteration count.
    pub async fn derive_key(
        &self,
        passphrase: &SecretString,
        salt: &[u8; SALT_LEN],
    ) -> Result<Zeroizing<[u8; KEY_LEN]>> {
        let provider = Arc::clone(&self.provider);
        let passphrase = passphrase.clone();
        let salt = *salt;
        let iterations = self.iterations;
        run_blocking(move || {
            provider.derive_key(passphrase.expose_secret().as_bytes(), &salt, iterations)
        })
        .await
    }

    /// Encrypt `secret` under `passphrase` without persisting anything.
    pub async fn encrypt(
        &self,
        secret: &SecretString,
        passphrase: &SecretString,
    ) -> Result<EncryptedRecord> {
        if passphrase.is_empty() {
            return Err(VaultError::PassphraseRequired);
        }
        let provider = Arc::clone(&self.provider);
        let secret = secret.clone();
        let passphrase = passphrase.clone();
        let iterations = self.iterations;
        run_blocking(move || encrypt_secret(provider.as_ref(), &secret, &passphrase, iterations))
            .await
    }

    /// Encrypt `secret` under `passphrase` and replace the persisted record.
    ///
    /// The store is written exactly once, after encryption has succeeded, so
    /// an encryption failure leaves the previous record untouched.
    pub async fn store(
        &self,
        secret: &SecretString,
        passphrase: &SecretString,
    ) -> Result<EncryptedRecord> {
        let record = self.encrypt(secret, passphrase).await?;
        self.records.save(&record).await?;
        info!(iterations = record.iterations, "API key stored");
        Ok(record)
    }

    /// Recover the secret from `record` with `passphrase`.
    pub async fn unlock(
        &self,
        record: &EncryptedRecord,
        passphrase: &SecretString,
    ) -> Result<SecretString> {
        if passphrase.is_empty() {
            return Err(VaultError::PassphraseRequired);
        }
        let provider = Arc::clone(&self.provider);
        let record = record.clone();
        let passphrase = passphrase.clone();
        let secret =
            run_blocking(move || decrypt_record(provider.as_ref(), &record, &passphrase)).await?;
        debug!("API key unlocked");
        Ok(secret)
    }

    /// The persisted record, if any.
    pub async fn load_record(&self) -> Result<Option<EncryptedRecord>> {
        self.records.load().await
    }

    /// Delete the persisted record. Forgetting nothing is not an error.
    pub async fn forget(&self) -> Result<()> {
        self.records.remove().await?;
        info!("API key record removed");
        Ok(())
    }
}

async fn run_blocking<T, F>(task: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| VaultError::Encryption(format!("crypto task failed: {e}")))?
}
