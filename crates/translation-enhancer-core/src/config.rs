use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};
use crate::language::{Language, LanguageRegistry, DEFAULT_SOURCE_LANGUAGE};
use crate::model::DEFAULT_MODEL_NAMESPACE;

/// Directory name under the user config dir
const APP_DIR: &str = "translation-enhancer";
/// Prefix for environment overrides, e.g. `ENHANCER__SCORER__ENDPOINT`
const ENV_PREFIX: &str = "ENHANCER";

/// Model store configuration for Hugging Face compatible hubs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelStoreConfig {
    #[serde(default = "default_hub_url")]
    pub hub_url: String,
    #[serde(default = "default_inference_url")]
    pub inference_url: String,
    /// Prefix of model identifiers; `<namespace>-<src>-<tgt>`
    #[serde(default = "default_namespace")]
    pub namespace: String,
    pub api_token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Maximum generated sequence length
    #[serde(default = "default_max_length")]
    pub max_length: u32,
}

fn default_hub_url() -> String {
    "https://huggingface.co".to_string()
}

fn default_inference_url() -> String {
    "https://api-inference.huggingface.co".to_string()
}

fn default_namespace() -> String {
    DEFAULT_MODEL_NAMESPACE.to_string()
}

const fn default_timeout_secs() -> u64 {
    60
}

const fn default_max_length() -> u32 {
    512
}

impl Default for ModelStoreConfig {
    fn default() -> Self {
        Self {
            hub_url: default_hub_url(),
            inference_url: default_inference_url(),
            namespace: default_namespace(),
            api_token: None,
            timeout_secs: default_timeout_secs(),
            max_length: default_max_length(),
        }
    }
}

/// Quality scorer service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScorerConfig {
    /// Scoring endpoint receiving references and candidates
    #[serde(default = "default_scorer_endpoint")]
    pub endpoint: String,
    /// BLEURT checkpoint the service should use
    #[serde(default = "default_checkpoint")]
    pub checkpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_scorer_endpoint() -> String {
    "http://localhost:8000/score".to_string()
}

fn default_checkpoint() -> String {
    "BLEURT-20".to_string()
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            endpoint: default_scorer_endpoint(),
            checkpoint: default_checkpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Speech synthesis configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// Disable to use a silent engine
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Synthesizer program (defaults to `espeak-ng`, or `say` on macOS)
    pub program: Option<String>,
    /// Extra arguments placed before the text
    #[serde(default)]
    pub args: Vec<String>,
}

/// Model cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Keep loaded models in memory between requests
    #[serde(default = "default_true")]
    pub models_enabled: bool,

    /// Maximum number of cached models
    #[serde(default = "default_max_models")]
    pub max_models: u64,

    /// Model cache TTL in seconds (0 = no expiry)
    #[serde(default)]
    pub ttl_seconds: u64,
}

const fn default_true() -> bool {
    true
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            program: None,
            args: Vec::new(),
        }
    }
}

const fn default_max_models() -> u64 {
    16
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            models_enabled: true,
            max_models: default_max_models(),
            ttl_seconds: 0,
        }
    }
}

/// Settings given on the command line or through the environment.
///
/// Each `Some` value replaces what the configuration files said.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub hub_url: Option<String>,
    pub inference_url: Option<String>,
    pub api_token: Option<String>,
    pub scorer_endpoint: Option<String>,
}

fn default_languages() -> Vec<Language> {
    LanguageRegistry::builtin().languages().to_vec()
}

fn default_source() -> String {
    DEFAULT_SOURCE_LANGUAGE.to_string()
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Languages offered to the user, in display order
    #[serde(default = "default_languages")]
    pub languages: Vec<Language>,

    /// Source language preselected in the UI
    #[serde(default = "default_source")]
    pub default_source: String,

    #[serde(default)]
    pub model_store: ModelStoreConfig,

    #[serde(default)]
    pub scorer: ScorerConfig,

    #[serde(default)]
    pub speech: SpeechConfig,

    #[serde(default)]
    pub cache: CacheConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            languages: default_languages(),
            default_source: default_source(),
            model_store: ModelStoreConfig::default(),
            scorer: ScorerConfig::default(),
            speech: SpeechConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::ConfigLoad(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| Error::ConfigLoad(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Layered load: user config, then ./config.toml, then `ENHANCER__*`
    /// environment variables. Later layers win.
    pub fn try_load() -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(config_dir) = crate::util::config_dir() {
            let user_config = config_dir.join(APP_DIR).join("config.toml");
            builder = builder.add_source(config::File::from(user_config).required(false));
        }

        let config: Self = builder
            .add_source(config::File::from(Path::new("config.toml")).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .and_then(|c| c.try_deserialize::<Self>())
            .map_err(|e| Error::ConfigLoad(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Like [`Self::try_load`], falling back to defaults on any failure
    pub fn load() -> Self {
        match Self::try_load() {
            Ok(config) => {
                tracing::debug!("Loaded layered configuration");
                config
            }
            Err(e) => {
                tracing::warn!("Failed to load configuration, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// Check cross-field constraints the type system can't express
    pub fn validate(&self) -> Result<()> {
        let registry = self.registry()?;

        if !registry.contains(&self.default_source) {
            return Err(Error::ConfigInvalid {
                field: "default_source".to_string(),
                reason: format!("'{}' is not a configured language", self.default_source),
            });
        }
        if self.model_store.timeout_secs == 0 {
            return Err(Error::ConfigInvalid {
                field: "model_store.timeout_secs".to_string(),
                reason: "must be positive".to_string(),
            });
        }
        if self.scorer.timeout_secs == 0 {
            return Err(Error::ConfigInvalid {
                field: "scorer.timeout_secs".to_string(),
                reason: "must be positive".to_string(),
            });
        }
        if self.model_store.namespace.is_empty() {
            return Err(Error::ConfigInvalid {
                field: "model_store.namespace".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Apply command line and environment overrides
    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(url) = overrides.hub_url {
            self.model_store.hub_url = url;
        }
        if let Some(url) = overrides.inference_url {
            self.model_store.inference_url = url;
        }
        if let Some(token) = overrides.api_token {
            self.model_store.api_token = Some(token);
        }
        if let Some(endpoint) = overrides.scorer_endpoint {
            self.scorer.endpoint = endpoint;
        }
    }

    /// Language registry described by this configuration
    pub fn registry(&self) -> Result<LanguageRegistry> {
        LanguageRegistry::new(self.languages.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.default_source, "English");
        assert_eq!(config.model_store.namespace, "Helsinki-NLP/opus-mt");
        assert!(config.speech.enabled);
        assert_eq!(config.languages.len(), 7);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[scorer]
endpoint = "http://scorer.internal/score"

[speech]
enabled = false
"#
        )
        .unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.scorer.endpoint, "http://scorer.internal/score");
        assert_eq!(config.scorer.checkpoint, "BLEURT-20");
        assert!(!config.speech.enabled);
        assert_eq!(config.model_store.hub_url, "https://huggingface.co");
        assert_eq!(config.languages.len(), 7);
    }

    #[test]
    fn test_custom_languages() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
default_source = "Italian"

[[languages]]
name = "Italian"
code = "it"

[[languages]]
name = "English"
code = "en"
"#
        )
        .unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        let registry = config.registry().unwrap();
        assert_eq!(registry.names(), vec!["Italian", "English"]);
    }

    #[test]
    fn test_default_source_must_be_registered() {
        let config = AppConfig {
            default_source: "Klingon".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(Error::ConfigInvalid { ref field, .. }) if field == "default_source"
        ));
    }

    #[test]
    fn test_example_config_parses() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../config.example.toml");
        let config = AppConfig::from_file(path).unwrap();
        assert_eq!(config.scorer.checkpoint, "BLEURT-20");
        assert_eq!(config.cache.max_models, 16);
    }

    #[test]
    fn test_overrides_replace_only_given_values() {
        let mut config = AppConfig::default();
        config.apply_overrides(ConfigOverrides {
            scorer_endpoint: Some("http://scorer:9000/score".to_string()),
            api_token: Some("hf_test".to_string()),
            ..Default::default()
        });

        assert_eq!(config.scorer.endpoint, "http://scorer:9000/score");
        assert_eq!(config.model_store.api_token.as_deref(), Some("hf_test"));
        assert_eq!(config.model_store.hub_url, "https://huggingface.co");
    }

    #[test]
    fn test_missing_file() {
        let result = AppConfig::from_file("/nonexistent/translation-enhancer.toml");
        assert!(matches!(result, Err(Error::ConfigLoad(_))));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = AppConfig::default();
        config.scorer.timeout_secs = 0;
        assert!(config.validate().is_err());
    }
}
