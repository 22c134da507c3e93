//! # foodchat-core
//!
//! Core types, configuration, and utilities for FoodChat.
//!
//! This crate provides shared functionality used across all FoodChat crates:
//!
//! - **Configuration**: Loading, validation, and persistence of the config file
//! - **Secrets**: A zeroizing, redacting string type for keys and passphrases
//! - **Utilities**: Path resolution, locale handling, and environment access

pub mod config;
pub mod env;
pub mod error;
pub mod locale;
pub mod paths;
pub mod secret;

// Re-exports for convenience
pub use config::Config;
pub use error::ConfigError;
pub use locale::Locale;
pub use secret::SecretString;
