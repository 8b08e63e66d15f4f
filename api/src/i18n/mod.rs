//! Localized user-facing texts.
//!
//! The catalog is read from `i18n/error_messages.toml` in the working
//! directory when present, so texts can be edited without a rebuild, and
//! falls back to the copy embedded at compile time.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub use sefr_shared::Language;

const EMBEDDED_CATALOG: &str = include_str!("../../i18n/error_messages.toml");

/// One text in both supported languages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalizedText {
    pub en: String,
    pub fa: String,
}

impl LocalizedText {
    pub fn get(&self, lang: Language) -> &str {
        match lang {
            Language::English => &self.en,
            Language::Persian => &self.fa,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub auth: HashMap<String, LocalizedText>,
    #[serde(default)]
    pub token: HashMap<String, LocalizedText>,
    #[serde(default)]
    pub validation: HashMap<String, LocalizedText>,
    #[serde(default)]
    pub general: HashMap<String, LocalizedText>,
    #[serde(default)]
    pub messages: HashMap<String, LocalizedText>,
}

impl Catalog {
    fn category(&self, category: &str) -> Option<&HashMap<String, LocalizedText>> {
        match category {
            "auth" => Some(&self.auth),
            "token" => Some(&self.token),
            "validation" => Some(&self.validation),
            "general" => Some(&self.general),
            "messages" => Some(&self.messages),
            _ => None,
        }
    }
}

pub static CATALOG: Lazy<Catalog> = Lazy::new(load_catalog);

fn load_catalog() -> Catalog {
    let path = Path::new("i18n/error_messages.toml");
    if path.exists() {
        match fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|content| toml::from_str::<Catalog>(&content).map_err(|e| e.to_string()))
        {
            Ok(catalog) => return catalog,
            Err(e) => tracing::warn!(
                path = %path.display(),
                error = %e,
                "Could not read message catalog, using embedded copy"
            ),
        }
    }

    toml::from_str(EMBEDDED_CATALOG).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Embedded message catalog is invalid");
        Catalog::default()
    })
}

/// Look up `category.key` in `lang`
pub fn get_message(category: &str, key: &str, lang: Language) -> Option<String> {
    CATALOG
        .category(category)?
        .get(key)
        .map(|text| text.get(lang).to_string())
}

/// Replace `{name}` placeholders in `template`
pub fn format_message(template: &str, params: &[(&str, String)]) -> String {
    params.iter().fold(template.to_string(), |text, (name, value)| {
        text.replace(&format!("{{{}}}", name), value)
    })
}

/// Localized and formatted text; the key itself when the catalog lacks it
pub fn localize(category: &str, key: &str, lang: Language, params: &[(&str, String)]) -> String {
    match get_message(category, key, lang) {
        Some(template) => format_message(&template, params),
        None => {
            tracing::warn!(category, key, "Missing catalog entry");
            key.to_string()
        }
    }
}

/// Success message from the `messages` section
pub fn message(key: &str, lang: Language) -> String {
    localize("messages", key, lang, &[])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_catalog_parses() {
        let catalog: Catalog = toml::from_str(EMBEDDED_CATALOG).unwrap();
        assert!(catalog.auth.contains_key("invalid_code"));
        assert!(catalog.token.contains_key("invalid_refresh_token"));
        assert!(catalog.messages.contains_key("registered"));
    }

    #[test]
    fn test_every_entry_has_both_languages() {
        let catalog: Catalog = toml::from_str(EMBEDDED_CATALOG).unwrap();
        for section in [&catalog.auth, &catalog.token, &catalog.validation, &catalog.general, &catalog.messages] {
            for (key, text) in section {
                assert!(!text.en.is_empty(), "{} has no English text", key);
                assert!(!text.fa.is_empty(), "{} has no Persian text", key);
            }
        }
    }

    #[test]
    fn test_localize_with_params() {
        let en = localize("validation", "too_short", Language::English, &[("field", "content".into()), ("min", "10".into())]);
        assert_eq!(en, "The field content must be at least 10 characters.");

        let fa = localize("auth", "invalid_code", Language::Persian, &[]);
        assert_eq!(fa, "کد تأیید نامعتبر یا منقضی شده است.");
    }

    #[test]
    fn test_missing_key_falls_back_to_key() {
        assert_eq!(localize("general", "no_such_key", Language::English, &[]), "no_such_key");
        assert!(get_message("unknown", "x", Language::English).is_none());
    }
}
