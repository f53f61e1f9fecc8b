use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tabula_core::AppError;

/// Interface language of a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    /// English.
    #[default]
    En,
    /// Turkish.
    Tr,
}

impl Language {
    /// Returns the language code.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Tr => "tr",
        }
    }
}

impl FromStr for Language {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Self::En),
            "tr" => Ok(Self::Tr),
            _ => Err(AppError::Validation(format!(
                "unsupported language '{value}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::Language;

    #[test]
    fn default_language_is_english() {
        assert_eq!(Language::default(), Language::En);
    }

    #[test]
    fn codes_parse_case_insensitively() {
        assert_eq!(Language::from_str("TR").ok(), Some(Language::Tr));
        assert!(Language::from_str("de").is_err());
    }
}
