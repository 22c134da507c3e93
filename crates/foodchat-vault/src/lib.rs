//! Passphrase-encrypted API key vault for FoodChat.
//!
//! The upstream API key is encrypted with AES-256-GCM under a key derived
//! from a user passphrase via PBKDF2-HMAC-SHA256. Each record carries its own
//! random salt and nonce and is stored as a small base64 JSON document.
//!
//! - [`CredentialVault`] performs `store`, `unlock` and `forget`.
//! - [`VaultSession`] drives the `NoRecord` / `Locked` / `Unlocked` lifecycle,
//!   including the one-shot auto-unlock and the "remember passphrase" toggle.
//! - [`RecordStore`] and [`PassphraseCache`] are the two persistence seams; the
//!   latter is the lower-trust store holding a plaintext passphrase on opt-in.

pub mod crypto;
pub mod error;
pub mod messages;
pub mod passphrase;
pub mod prompt;
pub mod record;
pub mod session;
pub mod store;
pub mod vault;

pub use crypto::{CryptoProvider, SystemCrypto};
pub use error::{Result, VaultError};
pub use messages::Message;
pub use passphrase::{FilePassphraseCache, MemoryPassphraseCache, PassphraseCache};
pub use prompt::{NoPrompt, PassphrasePrompt, PromptKind, ScriptedPrompt};
pub use record::EncryptedRecord;
pub use session::{UnlockOutcome, VaultSession, VaultState};
pub use store::{FileRecordStore, MemoryRecordStore, RecordStore};
pub use vault::CredentialVault;
