//! Configuration schema definitions.

use crate::locale::Locale;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Minimum PBKDF2 iteration count accepted anywhere in FoodChat.
pub const MIN_KDF_ITERATIONS: u32 = 100_000;

/// Maximum PBKDF2 iteration count accepted anywhere in FoodChat.
///
/// Records carry their own count unauthenticated, so this bounds the work a
/// tampered record can demand from `unlock`.
pub const MAX_KDF_ITERATIONS: u32 = 10_000_000;

/// Default PBKDF2 iteration count for new records.
pub const DEFAULT_KDF_ITERATIONS: u32 = 100_000;

/// Main FoodChat configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Language for user-facing messages.
    #[serde(default)]
    pub locale: Locale,

    /// Credential vault settings.
    #[serde(default)]
    pub vault: VaultConfig,
}

/// Credential vault configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultConfig {
    /// PBKDF2-HMAC-SHA256 iterations used when encrypting a new record.
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,

    /// Directory holding the encrypted record and the remembered passphrase.
    /// Defaults to the FoodChat base directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            kdf_iterations: DEFAULT_KDF_ITERATIONS,
            data_dir: None,
        }
    }
}

fn default_kdf_iterations() -> u32 {
    DEFAULT_KDF_ITERATIONS
}
