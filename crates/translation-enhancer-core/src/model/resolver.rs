use serde::{Deserialize, Serialize};

use crate::language::LanguageCode;

/// Namespace of the OPUS-MT Marian models
pub const DEFAULT_MODEL_NAMESPACE: &str = "Helsinki-NLP/opus-mt";

/// Key used to look up a translation model in a model store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelId(String);

impl ModelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Derives model identifiers from language pairs.
///
/// The identifier is `<namespace>-<source>-<target>`. Nothing is checked
/// against the store here; a pair without a published model only fails once
/// the store is asked to load it.
#[derive(Debug, Clone)]
pub struct ModelResolver {
    namespace: String,
}

impl ModelResolver {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn resolve(&self, source: &LanguageCode, target: &LanguageCode) -> ModelId {
        ModelId(format!("{}-{}-{}", self.namespace, source, target))
    }
}

impl Default for ModelResolver {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL_NAMESPACE)
    }
}
