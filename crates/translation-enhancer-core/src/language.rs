//! Language registry: the fixed set of languages offered to the user.
//!
//! Names are what the user picks ("English"), codes are what model
//! identifiers are built from ("en"). The registry keeps the two in a strict
//! one-to-one correspondence and remembers the order languages were
//! registered in, which is the order dropdowns show them.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{Error, Result};

/// Language codes following ISO 639-1
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageCode(pub String);

impl LanguageCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for LanguageCode {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A registered language
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    /// Display name (e.g., "English")
    pub name: String,
    /// ISO language code (e.g., "en")
    pub code: LanguageCode,
}

impl Language {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: LanguageCode::new(code),
        }
    }
}

/// Languages shipped with the demo, in dropdown order.
const BUILTIN_LANGUAGES: [(&str, &str); 7] = [
    ("English", "en"),
    ("Spanish", "es"),
    ("French", "fr"),
    ("German", "de"),
    ("Hindi", "hi"),
    ("Telugu", "te"),
    ("Tamil", "ta"),
];

/// Default source language shown when the UI opens
pub const DEFAULT_SOURCE_LANGUAGE: &str = "English";

/// Bidirectional name/code mapping over a closed set of languages.
#[derive(Debug, Clone)]
pub struct LanguageRegistry {
    languages: Vec<Language>,
}

impl LanguageRegistry {
    /// Build a registry, rejecting duplicate names or codes.
    pub fn new(languages: Vec<Language>) -> Result<Self> {
        if languages.is_empty() {
            return Err(Error::RegistryInvalid("no languages registered".to_string()));
        }

        let mut names = HashSet::new();
        let mut codes = HashSet::new();
        for lang in &languages {
            if lang.name.is_empty() || lang.code.as_str().is_empty() {
                return Err(Error::RegistryInvalid(format!(
                    "empty name or code in entry {lang:?}"
                )));
            }
            if !names.insert(lang.name.as_str()) {
                return Err(Error::RegistryInvalid(format!(
                    "language name '{}' registered twice",
                    lang.name
                )));
            }
            if !codes.insert(lang.code.as_str()) {
                return Err(Error::RegistryInvalid(format!(
                    "language code '{}' registered twice",
                    lang.code
                )));
            }
        }

        Ok(Self { languages })
    }

    /// The seven languages of the demo.
    pub fn builtin() -> Self {
        Self {
            languages: BUILTIN_LANGUAGES
                .iter()
                .map(|(name, code)| Language::new(*name, *code))
                .collect(),
        }
    }

    /// Code for a registered language name
    pub fn code_for(&self, name: &str) -> Result<&LanguageCode> {
        self.languages
            .iter()
            .find(|lang| lang.name == name)
            .map(|lang| &lang.code)
            .ok_or_else(|| Error::UnknownLanguage(name.to_string()))
    }

    /// Name for a registered language code
    pub fn name_for(&self, code: &str) -> Option<&str> {
        self.languages
            .iter()
            .find(|lang| lang.code.as_str() == code)
            .map(|lang| lang.name.as_str())
    }

    /// Every registered name except `source`, in registry order.
    pub fn valid_targets(&self, source: &str) -> Vec<&str> {
        self.languages
            .iter()
            .map(|lang| lang.name.as_str())
            .filter(|name| *name != source)
            .collect()
    }

    /// All registered names, in registry order
    pub fn names(&self) -> Vec<&str> {
        self.languages.iter().map(|lang| lang.name.as_str()).collect()
    }

    pub fn languages(&self) -> &[Language] {
        &self.languages
    }

    pub fn contains(&self, name: &str) -> bool {
        self.languages.iter().any(|lang| lang.name == name)
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_codes() {
        let registry = LanguageRegistry::builtin();
        assert_eq!(registry.code_for("English").unwrap().as_str(), "en");
        assert_eq!(registry.code_for("Telugu").unwrap().as_str(), "te");
        assert_eq!(registry.name_for("ta"), Some("Tamil"));
        assert_eq!(registry.len(), 7);
    }

    #[test]
    fn test_unknown_language() {
        let registry = LanguageRegistry::builtin();
        let err = registry.code_for("Klingon").unwrap_err();
        assert!(matches!(err, Error::UnknownLanguage(ref name) if name == "Klingon"));
        assert_eq!(registry.name_for("tlh"), None);
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let registry = LanguageRegistry::builtin();
        assert!(registry.code_for("english").is_err());
    }

    #[test]
    fn test_valid_targets_excludes_source_and_keeps_order() {
        let registry = LanguageRegistry::builtin();
        for source in registry.names() {
            let targets = registry.valid_targets(source);
            assert!(!targets.contains(&source));
            assert_eq!(targets.len(), registry.len() - 1);

            let expected: Vec<&str> = registry
                .names()
                .into_iter()
                .filter(|name| *name != source)
                .collect();
            assert_eq!(targets, expected);
        }
    }

    #[test]
    fn test_valid_targets_for_english() {
        let registry = LanguageRegistry::builtin();
        assert_eq!(
            registry.valid_targets("English"),
            vec!["Spanish", "French", "German", "Hindi", "Telugu", "Tamil"]
        );
    }

    #[test]
    fn test_valid_targets_for_unregistered_source_lists_everything() {
        let registry = LanguageRegistry::builtin();
        assert_eq!(registry.valid_targets("Klingon"), registry.names());
    }

    #[test]
    fn test_mapping_is_bijective() {
        let registry = LanguageRegistry::builtin();
        for name in registry.names() {
            let code = registry.code_for(name).unwrap();
            assert_eq!(registry.name_for(code.as_str()), Some(name));
        }
    }

    #[test]
    fn test_rejects_duplicate_code() {
        let result = LanguageRegistry::new(vec![
            Language::new("English", "en"),
            Language::new("Anglais", "en"),
        ]);
        assert!(matches!(result, Err(Error::RegistryInvalid(_))));
    }

    #[test]
    fn test_rejects_duplicate_name() {
        let result = LanguageRegistry::new(vec![
            Language::new("English", "en"),
            Language::new("English", "eng"),
        ]);
        assert!(matches!(result, Err(Error::RegistryInvalid(_))));
    }

    #[test]
    fn test_rejects_empty_registry() {
        assert!(LanguageRegistry::new(Vec::new()).is_err());
    }
}
