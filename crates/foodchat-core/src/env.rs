//! Environment variable handling.

use std::env;

/// Well-known environment variable names.
pub mod vars {
    /// Path to the config file.
    pub const FOODCHAT_CONFIG: &str = "FOODCHAT_CONFIG";
    /// Vault passphrase for non-interactive use.
    pub const FOODCHAT_PASSPHRASE: &str = "FOODCHAT_PASSPHRASE";
    /// Replacement passphrase for non-interactive `key passwd`.
    pub const FOODCHAT_NEW_PASSPHRASE: &str = "FOODCHAT_NEW_PASSPHRASE";
    /// Never prompt on the terminal when set to a true value.
    pub const FOODCHAT_NO_PROMPT: &str = "FOODCHAT_NO_PROMPT";
    /// Locale override (`de` or `en`).
    pub const FOODCHAT_LOCALE: &str = "FOODCHAT_LOCALE";
    /// Data directory override.
    pub const FOODCHAT_HOME: &str = "FOODCHAT_HOME";
}

/// Get an environment variable, returning None if not set or empty.
pub fn get_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable as a boolean.
pub fn get_bool(name: &str) -> bool {
    get_var(name)
        .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_var_missing() {
        assert!(get_var("FOODCHAT_TEST_SURELY_UNSET_VAR").is_none());
        assert!(!get_bool("FOODCHAT_TEST_SURELY_UNSET_VAR"));
    }

    #[test]
    fn test_get_bool_truthy_values() {
        for (i, value) in ["1", "true", "YES", "on"].iter().enumerate() {
            let name = format!("FOODCHAT_TEST_BOOL_{i}");
            env::set_var(&name, value);
            assert!(get_bool(&name), "{value} should be truthy");
            env::remove_var(&name);
        }
    }
}
