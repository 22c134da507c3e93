//! Path resolution utilities.

use crate::env;
use crate::error::ConfigError;
use std::path::{Path, PathBuf};

/// File name of the encrypted API key record.
pub const RECORD_FILE_NAME: &str = "foodchat_api_cipher.json";

/// File name of the remembered passphrase (plaintext, opt-in only).
pub const PASSPHRASE_FILE_NAME: &str = "foodchat_passphrase";

/// Get the FoodChat base directory (`$FOODCHAT_HOME` or `~/.foodchat`).
pub fn base_dir() -> Result<PathBuf, ConfigError> {
    if let Some(dir) = env::get_var(env::vars::FOODCHAT_HOME) {
        return Ok(expand_tilde(&dir));
    }
    let home = dirs::home_dir().ok_or_else(|| {
        ConfigError::Validation("Could not determine home directory".to_string())
    })?;
    Ok(home.join(".foodchat"))
}

/// Get the main config file path (`~/.foodchat/foodchat.json5`).
pub fn config_file() -> Result<PathBuf, ConfigError> {
    Ok(base_dir()?.join("foodchat.json5"))
}

/// Path of the encrypted record inside a data directory.
pub fn record_file(data_dir: &Path) -> PathBuf {
    data_dir.join(RECORD_FILE_NAME)
}

/// Path of the remembered passphrase inside a data directory.
pub fn passphrase_file(data_dir: &Path) -> PathBuf {
    data_dir.join(PASSPHRASE_FILE_NAME)
}

/// Ensure a directory exists.
///
/// A directory created here is restricted to the owner on Unix. An existing
/// directory keeps its permissions, with a warning if others can read it.
pub fn ensure_private_dir(dir: &Path) -> Result<(), ConfigError> {
    if dir.is_dir() {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(dir)?.permissions().mode();
            if mode & 0o077 != 0 {
                tracing::warn!(
                    path = %dir.display(),
                    mode = %format!("{:o}", mode & 0o777),
                    "data directory is accessible to other users"
                );
            }
        }
        return Ok(());
    }

    std::fs::create_dir_all(dir)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(dir, std::fs::Permissions::from_mode(0o700))?;
    }

    Ok(())
}

/// Expand tilde (~) in a path.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
