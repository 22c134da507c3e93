//! Error types for the credential vault.

use foodchat_core::Locale;
use thiserror::Error;

use crate::messages::Message;

/// Errors that can occur during vault operations.
#[derive(Debug, Error)]
pub enum VaultError {
    /// The cryptographic primitive failed while storing; nothing was persisted.
    #[error("Encryption failed: {0}")]
    Encryption(String),

    /// Authentication failed while unlocking. Wrong passphrase, corruption and
    /// tampering all surface as this single variant.
    #[error("Invalid passphrase")]
    InvalidPassphrase,

    /// The persisted record is structurally unusable.
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    #[error("Passphrase required")]
    PassphraseRequired,

    #[error("No API key stored")]
    NoRecord,

    #[error("Vault is locked")]
    NotUnlocked,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl VaultError {
    /// Whether the user can simply try again (e.g. re-enter the passphrase).
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            VaultError::InvalidPassphrase | VaultError::PassphraseRequired
        )
    }

    /// The localized message shown to the user for this error.
    pub fn message(&self) -> Message {
        match self {
            VaultError::Encryption(_) => Message::PassphraseEncryptError,
            VaultError::InvalidPassphrase => Message::PassphraseInvalid,
            VaultError::MalformedRecord(_) => Message::RecordMalformed,
            VaultError::PassphraseRequired => Message::PassphraseSetupRequired,
            VaultError::NoRecord => Message::NeedApiKey,
            VaultError::NotUnlocked => Message::VaultLocked,
            VaultError::Storage(_) | VaultError::Io(_) => Message::StorageFailed,
        }
    }

    /// Shorthand for `self.message().text(locale)`.
    pub fn user_message(&self, locale: Locale) -> &'static str {
        self.message().text(locale)
    }
}

/// Convenience result alias for vault operations.
pub type Result<T> = std::result::Result<T, VaultError>;
