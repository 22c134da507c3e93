//! Configuration loading and persistence.

use super::{Config, MAX_KDF_ITERATIONS, MIN_KDF_ITERATIONS};
use crate::env;
use crate::error::ConfigError;
use crate::locale::Locale;
use crate::paths;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

impl Config {
    /// Load configuration from the default path.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = paths::config_file()?;
        Self::load(&path)
    }

    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Load the file at `path` for editing, or defaults if it does not exist.
    ///
    /// Unlike [`Config::load_or_default_from`], parse errors are returned and
    /// no environment overrides are applied, so saving the result keeps what
    /// the file said.
    pub fn load_for_update(path: &Path) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::NotFound(_)) => Ok(Self::default()),
            other => other,
        }
    }

    /// Parse configuration from a string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        json5::from_str(content).map_err(|e| ConfigError::Json5(e.to_string()))
    }

    /// Save configuration to the default path.
    pub fn save_default(&self) -> Result<(), ConfigError> {
        let path = paths::config_file()?;
        self.save(&path)
    }

    /// Save configuration to a file path.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_json5()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write atomically
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, &content)?;
        fs::rename(&temp_path, path)?;

        Ok(())
    }

    /// Serialize to JSON5 string.
    pub fn to_json5(&self) -> Result<String, ConfigError> {
        // json5 has no serializer; plain JSON is valid JSON5
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Validate the configuration, collecting all errors before returning.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.vault.kdf_iterations < MIN_KDF_ITERATIONS {
            errors.push(format!(
                "vault.kdf_iterations must be at least {}, got {}",
                MIN_KDF_ITERATIONS, self.vault.kdf_iterations
            ));
        } else if self.vault.kdf_iterations > MAX_KDF_ITERATIONS {
            errors.push(format!(
                "vault.kdf_iterations must be at most {}, got {}",
                MAX_KDF_ITERATIONS, self.vault.kdf_iterations
            ));
        }

        if let Some(dir) = &self.vault.data_dir {
            if dir.as_os_str().is_empty() {
                errors.push("vault.data_dir must not be empty".to_string());
            } else if dir.is_file() {
                errors.push(format!(
                    "vault.data_dir {} is a file, expected a directory",
                    dir.display()
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors.join("; ")))
        }
    }

    /// Directory holding vault files, honouring `vault.data_dir`.
    pub fn data_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.vault.data_dir {
            Some(dir) => Ok(paths::expand_tilde(&dir.to_string_lossy())),
            None => paths::base_dir(),
        }
    }

    /// Load configuration from `path` (or the default path), falling back to
    /// defaults if no file exists.
    ///
    /// A file that exists but fails to parse is reported and replaced by
    /// defaults so the vault stays usable. `FOODCHAT_LOCALE` overrides the
    /// configured locale either way.
    pub fn load_or_default_from(path: Option<&Path>) -> Self {
        let loaded = match path {
            Some(path) => Self::load(path),
            None => Self::load_default(),
        };
        let mut config = match loaded {
            Ok(config) => config,
            Err(ConfigError::NotFound(_)) => Self::default(),
            Err(e) => {
                warn!(error = %e, "failed to load config, using defaults");
                Self::default()
            }
        };
        config.apply_env_overrides();
        config
    }

    /// Load configuration from the default path, falling back to defaults.
    pub fn load_or_default() -> Self {
        Self::load_or_default_from(None)
    }

    /// Apply environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Some(value) = env::get_var(env::vars::FOODCHAT_LOCALE) {
            match value.parse::<Locale>() {
                Ok(locale) => self.locale = locale,
                Err(e) => warn!(error = %e, "ignoring {}", env::vars::FOODCHAT_LOCALE),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_KDF_ITERATIONS;
    use tempfile::TempDir;

    #[test]
    fn test_parse_minimal_config() {
        let config = Config::parse("{}").unwrap();
        assert_eq!(config.locale, Locale::De);
        assert_eq!(config.vault.kdf_iterations, DEFAULT_KDF_ITERATIONS);
        assert!(config.vault.data_dir.is_none());
    }

    #[test]
    fn test_parse_json5_with_comments() {
        let content = r#"{
            // user prefers English
            locale: "en",
            vault: { kdf_iterations: 250000, },
        }"#;

        let config = Config::parse(content).unwrap();
        assert_eq!(config.locale, Locale::En);
        assert_eq!(config.vault.kdf_iterations, 250_000);
    }

    #[test]
    fn test_parse_invalid() {
        assert!(matches!(
            Config::parse("not valid json"),
            Err(ConfigError::Json5(_))
        ));
        assert!(Config::parse(r#"{ locale: "fr" }"#).is_err());
    }

    #[test]
    fn test_validate_defaults() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_low_iterations() {
        let mut config = Config::default();
        config.vault.kdf_iterations = 1_000;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("kdf_iterations"), "{err}");
    }

    #[test]
    fn test_validate_high_iterations() {
        let mut config = Config::default();
        config.vault.kdf_iterations = MAX_KDF_ITERATIONS;
        assert!(config.validate().is_ok());

        config.vault.kdf_iterations = MAX_KDF_ITERATIONS + 1;
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("at most"), "{err}");
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("not-a-dir");
        fs::write(&file, "x").unwrap();

        let mut config = Config::default();
        config.vault.kdf_iterations = 10;
        config.vault.data_dir = Some(file);

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("kdf_iterations"), "{err}");
        assert!(err.contains("is a file"), "{err}");
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("sub").join("foodchat.json5");

        let mut config = Config::default();
        config.locale = Locale::En;
        config.vault.data_dir = Some(tmp.path().join("data"));
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.locale, Locale::En);
        assert_eq!(loaded.vault.data_dir, Some(tmp.path().join("data")));
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load(Path::new("/nonexistent/foodchat.json5"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_or_default_from_broken_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("foodchat.json5");
        fs::write(&path, "{ vault: ").unwrap();

        let config = Config::load_or_default_from(Some(path.as_path()));
        assert_eq!(config.vault.kdf_iterations, DEFAULT_KDF_ITERATIONS);
    }

    #[test]
    fn test_load_for_update() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("foodchat.json5");

        let config = Config::load_for_update(&path).unwrap();
        assert_eq!(config.vault.kdf_iterations, DEFAULT_KDF_ITERATIONS);

        fs::write(&path, "{ vault: ").unwrap();
        assert!(matches!(
            Config::load_for_update(&path),
            Err(ConfigError::Json5(_))
        ));
    }

    #[test]
    fn test_data_dir_override() {
        let mut config = Config::default();
        config.vault.data_dir = Some(PathBuf::from("/srv/foodchat"));
        assert_eq!(config.data_dir().unwrap(), PathBuf::from("/srv/foodchat"));
    }
}
