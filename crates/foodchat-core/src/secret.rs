//! Secure string handling with memory protection.

use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A string that is zeroed on drop, used for API keys and passphrases.
///
/// `Debug` and `Display` never print the value. There is deliberately no
/// `Serialize` impl: anything that must reach disk goes through a store that
/// makes the trust decision explicit.
#[derive(Clone, Default, Zeroize, ZeroizeOnDrop)]
pub struct SecretString {
    inner: String,
}

impl SecretString {
    /// Create a new secret string.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            inner: value.into(),
        }
    }

    /// Expose the secret value.
    ///
    /// Use sparingly - only when the actual value is needed.
    pub fn expose_secret(&self) -> &str {
        &self.inner
    }

    /// Check if the secret is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Get the length of the secret in bytes.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Short preview for display: `"sk-t...-123"`.
    ///
    /// Values shorter than 10 characters are fully masked as `"****"`.
    pub fn masked(&self) -> String {
        let chars: Vec<char> = self.inner.chars().collect();
        if chars.len() < 10 {
            return "****".to_string();
        }
        let prefix: String = chars[..4].iter().collect();
        let suffix: String = chars[chars.len() - 4..].iter().collect();
        format!("{prefix}...{suffix}")
    }
}

// Never print secrets
impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl PartialEq for SecretString {
    fn eq(&self, other: &Self) -> bool {
        constant_time_eq(self.inner.as_bytes(), other.inner.as_bytes())
    }
}

impl Eq for SecretString {}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Constant-time byte comparison to prevent timing attacks.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}
