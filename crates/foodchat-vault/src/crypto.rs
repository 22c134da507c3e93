//! AES-256-GCM encryption with PBKDF2-HMAC-SHA256 key derivation.
//!
//! The primitives sit behind [`CryptoProvider`] so the vault can be driven by
//! a deterministic double in tests. [`encrypt_secret`] and [`decrypt_record`]
//! are the two record-level operations built on top of a provider.

use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, KeyInit, Nonce};
use chrono::Utc;
use foodchat_core::SecretString;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::error::{Result, VaultError};
use crate::record::{EncryptedRecord, KEY_LEN, NONCE_LEN, SALT_LEN};

/// The cryptographic capabilities the vault depends on.
pub trait CryptoProvider: Send + Sync {
    /// Fill `buf` with cryptographically secure random bytes.
    fn fill_random(&self, buf: &mut [u8]) -> Result<()>;

    /// Derive a 256-bit key from `passphrase` and `salt`. Must be
    /// deterministic for identical inputs.
    fn derive_key(
        &self,
        passphrase: &[u8],
        salt: &[u8; SALT_LEN],
        iterations: u32,
    ) -> Result<Zeroizing<[u8; KEY_LEN]>>;

    /// Encrypt `plaintext`, returning the ciphertext with the tag appended.
    fn seal(
        &self,
        key: &[u8; KEY_LEN],
        nonce: &[u8; NONCE_LEN],
        plaintext: &[u8],
    ) -> Result<Vec<u8>>;

    /// Authenticate and decrypt. Any authentication failure is
    /// [`VaultError::InvalidPassphrase`].
    fn open(
        &self,
        key: &[u8; KEY_LEN],
        nonce: &[u8; NONCE_LEN],
        ciphertext: &[u8],
    ) -> Result<Zeroizing<Vec<u8>>>;
}

/// Production provider: OS RNG, PBKDF2-HMAC-SHA256 and AES-256-GCM.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCrypto;

impl CryptoProvider for SystemCrypto {
    fn fill_random(&self, buf: &mut [u8]) -> Result<()> {
        OsRng
            .try_fill_bytes(buf)
            .map_err(|e| VaultError::Encryption(format!("random source unavailable: {e}")))
    }

    fn derive_key(
        &self,
        passphrase: &[u8],
        salt: &[u8; SALT_LEN],
        iterations: u32,
    ) -> Result<Zeroizing<[u8; KEY_LEN]>> {
        if iterations == 0 {
            return Err(VaultError::Encryption(
                "PBKDF2 iteration count must be positive".to_string(),
            ));
        }
        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        pbkdf2::pbkdf2_hmac::<Sha256>(passphrase, salt, iterations, key.as_mut());
        Ok(key)
    }

    fn seal(
        &self,
        key: &[u8; KEY_LEN],
        nonce: &[u8; NONCE_LEN],
        plaintext: &[u8],
    ) -> Result<Vec<u8>> {
        let cipher = Aes256Gcm::new_from_slice(key)
            .map_err(|e| VaultError::Encryption(e.to_string()))?;
        cipher
            .encrypt(Nonce::from_slice(nonce), plaintext)
            .map_err(|e| VaultError::Encryption(e.to_string()))
    }

    fn open(
        &self,
        key: &[u8; KEY_LEN],
        nonce: &[u8; NONCE_LEN],
        ciphertext: &[u8],
    ) -> Result<Zeroizing<Vec<u8>>> {
        let cipher = Aes256Gcm::new_from_slice(key)
            .map_err(|e| VaultError::Encryption(e.to_string()))?;
        cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map(Zeroizing::new)
            .map_err(|_| VaultError::InvalidPassphrase)
    }
}

/// Encrypt `secret` under `passphrase` into a complete record.
///
/// A fresh salt and nonce are drawn on every call.
pub fn encrypt_secret(
    provider: &dyn CryptoProvider,
    secret: &SecretString,
    passphrase: &SecretString,
    iterations: u32,
) -> Result<EncryptedRecord> {
    if passphrase.is_empty() {
        return Err(VaultError::PassphraseRequired);
    }

    let mut salt = [0u8; SALT_LEN];
    provider.fill_random(&mut salt)?;
    let mut nonce = [0u8; NONCE_LEN];
    provider.fill_random(&mut nonce)?;

    let key = provider.derive_key(passphrase.expose_secret().as_bytes(), &salt, iterations)?;
    let ciphertext = provider.seal(&key, &nonce, secret.expose_secret().as_bytes())?;

    Ok(EncryptedRecord {
        salt,
        nonce,
        ciphertext,
        iterations,
        created_at: Some(Utc::now()),
    })
}

/// Recover the secret from `record` with `passphrase`.
///
/// Fails closed: no partial plaintext is ever returned.
pub fn decrypt_record(
    provider: &dyn CryptoProvider,
    record: &EncryptedRecord,
    passphrase: &SecretString,
) -> Result<SecretString> {
    if passphrase.is_empty() {
        return Err(VaultError::PassphraseRequired);
    }

    let key = provider.derive_key(
        passphrase.expose_secret().as_bytes(),
        &record.salt,
        record.iterations,
    )?;
    let plaintext = provider.open(&key, &record.nonce, &record.ciphertext)?;

    // Authenticated, so invalid UTF-8 means the record was never ours.
    let text = std::str::from_utf8(&plaintext).map_err(|_| {
        VaultError::MalformedRecord("decrypted value is not valid UTF-8".to_string())
    })?;
    Ok(SecretString::new(text))
}
