//! Language and internationalization types

use serde::{Deserialize, Serialize};

/// Language used for user-facing messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "fa")]
    Persian,
}

impl Language {
    /// Extract language from an Accept-Language header. The first listed
    /// language we support wins; anything else falls back to English.
    pub fn from_accept_language(header: &str) -> Self {
        header
            .split(',')
            .filter_map(|part| part.split(';').next())
            .map(|tag| tag.trim().to_lowercase())
            .find_map(|tag| {
                let primary = tag.split('-').next().unwrap_or_default();
                primary.parse::<Language>().ok()
            })
            .unwrap_or_default()
    }

    /// Get language code (ISO 639-1)
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Persian => "fa",
        }
    }

    /// Check if language uses right-to-left script
    pub fn is_rtl(&self) -> bool {
        matches!(self, Language::Persian)
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "en" | "eng" | "english" => Ok(Language::English),
            "fa" | "per" | "fas" | "persian" | "farsi" => Ok(Language::Persian),
            _ => Err(format!("Unsupported language: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_from_header() {
        assert_eq!(Language::from_accept_language("en-US,en;q=0.9"), Language::English);
        assert_eq!(Language::from_accept_language("fa-IR,fa;q=0.9,en;q=0.8"), Language::Persian);
        assert_eq!(Language::from_accept_language("de-DE,fa;q=0.5"), Language::Persian);
        assert_eq!(Language::from_accept_language("fr-FR"), Language::English);
        assert_eq!(Language::from_accept_language(""), Language::English);
    }

    #[test]
    fn test_language_properties() {
        assert_eq!(Language::English.code(), "en");
        assert!(!Language::English.is_rtl());
        assert_eq!(Language::Persian.to_string(), "fa");
        assert!(Language::Persian.is_rtl());
        assert!("klingon".parse::<Language>().is_err());
    }
}
