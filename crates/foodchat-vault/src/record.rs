//! The persisted encrypted record and its JSON encoding.
//!
//! On disk a record looks like
//!
//! ```json
//! { "salt": "<base64>", "iv": "<base64>", "ciphertext": "<base64>",
//!   "iterations": 100000, "created_at": "2026-01-01T00:00:00Z" }
//! ```
//!
//! `iterations` and `created_at` are optional on read. A record without
//! `iterations` was written with [`LEGACY_KDF_ITERATIONS`].

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use foodchat_core::config::{MAX_KDF_ITERATIONS, MIN_KDF_ITERATIONS};
use serde::{Deserialize, Serialize};

use crate::error::{Result, VaultError};

/// PBKDF2 salt length in bytes.
pub const SALT_LEN: usize = 16;
/// AES-GCM nonce length in bytes.
pub const NONCE_LEN: usize = 12;
/// AES-GCM authentication tag length in bytes.
pub const TAG_LEN: usize = 16;
/// Derived key length in bytes (AES-256).
pub const KEY_LEN: usize = 32;

/// Iteration count assumed for records that do not state one.
pub const LEGACY_KDF_ITERATIONS: u32 = 100_000;

/// An encrypted API key as persisted.
///
/// Only produced by a successful encryption or by decoding a structurally
/// valid stored document. Decoding enforces field lengths, so holders of an
/// `EncryptedRecord` never need to re-check them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RecordWire", into = "RecordWire")]
pub struct EncryptedRecord {
    /// Random PBKDF2 salt.
    pub salt: [u8; SALT_LEN],
    /// Random AES-GCM nonce, unique per encryption.
    pub nonce: [u8; NONCE_LEN],
    /// AES-GCM output with the tag appended.
    pub ciphertext: Vec<u8>,
    /// PBKDF2 iteration count used to derive the key.
    pub iterations: u32,
    /// When the record was written. Metadata only, not authenticated.
    pub created_at: Option<DateTime<Utc>>,
}

impl EncryptedRecord {
    /// Decode a record from its JSON text.
    ///
    /// Any structural problem (invalid JSON, missing field, undecodable
    /// base64, wrong lengths) is reported as [`VaultError::MalformedRecord`].
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| VaultError::MalformedRecord(e.to_string()))
    }

    /// Encode the record as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| VaultError::Storage(format!("failed to encode record: {e}")))
    }
}

/// Text-safe wire form of [`EncryptedRecord`].
#[derive(Debug, Serialize, Deserialize)]
struct RecordWire {
    salt: String,
    iv: String,
    ciphertext: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    iterations: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_at: Option<DateTime<Utc>>,
}

impl TryFrom<RecordWire> for EncryptedRecord {
    type Error = String;

    fn try_from(wire: RecordWire) -> std::result::Result<Self, String> {
        let salt = decode_fixed::<SALT_LEN>("salt", &wire.salt)?;
        let nonce = decode_fixed::<NONCE_LEN>("iv", &wire.iv)?;
        let ciphertext = decode_field("ciphertext", &wire.ciphertext)?;
        if ciphertext.len() < TAG_LEN {
            return Err(format!(
                "ciphertext is {} bytes, shorter than the {TAG_LEN}-byte tag",
                ciphertext.len()
            ));
        }

        let iterations = wire.iterations.unwrap_or(LEGACY_KDF_ITERATIONS);
        if iterations < MIN_KDF_ITERATIONS {
            return Err(format!(
                "iteration count {iterations} is below the minimum of {MIN_KDF_ITERATIONS}"
            ));
        }
        if iterations > MAX_KDF_ITERATIONS {
            return Err(format!(
                "iteration count {iterations} is above the maximum of {MAX_KDF_ITERATIONS}"
            ));
        }

        Ok(Self {
            salt,
            nonce,
            ciphertext,
            iterations,
            created_at: wire.created_at,
        })
    }
}

impl From<EncryptedRecord> for RecordWire {
    fn from(record: EncryptedRecord) -> Self {
        Self {
            salt: STANDARD.encode(record.salt),
            iv: STANDARD.encode(record.nonce),
            ciphertext: STANDARD.encode(&record.ciphertext),
            iterations: Some(record.iterations),
            created_at: record.created_at,
        }
    }
}

fn decode_field(name: &str, value: &str) -> std::result::Result<Vec<u8>, String> {
    if value.is_empty() {
        return Err(format!("{name} is empty"));
    }
    STANDARD
        .decode(value)
        .map_err(|e| format!("{name} is not valid base64: {e}"))
}

fn decode_fixed<const N: usize>(name: &str, value: &str) -> std::result::Result<[u8; N], String> {
    let bytes = decode_field(name, value)?;
    let len = bytes.len();
    bytes
        .try_into()
        .map_err(|_| format!("{name} is {len} bytes, expected {N}"))
}
