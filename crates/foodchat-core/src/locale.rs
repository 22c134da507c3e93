//! Supported user-facing locales.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Language used for user-facing messages.
///
/// German is the fallback, matching the product's primary audience.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    De,
    En,
}

impl Locale {
    /// All supported locales.
    pub const ALL: [Locale; 2] = [Locale::De, Locale::En];

    /// Short language code (`de`, `en`).
    pub fn code(&self) -> &'static str {
        match self {
            Locale::De => "de",
            Locale::En => "en",
        }
    }

    /// BCP 47 tag used for date and number formatting.
    pub fn tag(&self) -> &'static str {
        match self {
            Locale::De => "de-DE",
            Locale::En => "en-US",
        }
    }

    /// Parse a code, falling back to the default locale when unsupported.
    pub fn parse_or_fallback(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        // Accept full tags such as "en-US" as well as bare codes.
        let code = lower.split(|c: char| c == '-' || c == '_').next().unwrap_or_default();
        match code {
            "de" => Ok(Locale::De),
            "en" => Ok(Locale::En),
            _ => Err(ConfigError::UnsupportedLocale(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_codes_and_tags() {
        assert_eq!("de".parse::<Locale>().unwrap(), Locale::De);
        assert_eq!("EN".parse::<Locale>().unwrap(), Locale::En);
        assert_eq!("en-US".parse::<Locale>().unwrap(), Locale::En);
        assert_eq!("de_AT".parse::<Locale>().unwrap(), Locale::De);
    }

    #[test]
    fn test_unsupported_locale() {
        assert!(matches!(
            "fr".parse::<Locale>(),
            Err(ConfigError::UnsupportedLocale(_))
        ));
        assert_eq!(Locale::parse_or_fallback("fr"), Locale::De);
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Locale::En).unwrap();
        assert_eq!(json, "\"en\"");
        let parsed: Locale = serde_json::from_str("\"de\"").unwrap();
        assert_eq!(parsed, Locale::De);
    }

    #[test]
    fn test_tags() {
        assert_eq!(Locale::De.tag(), "de-DE");
        assert_eq!(Locale::En.tag(), "en-US");
        assert_eq!(Locale::En.to_string(), "en");
    }
}
