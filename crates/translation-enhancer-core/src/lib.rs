//! Translation Enhancer Core Library
//!
//! This library provides the core functionality of the translation enhancer:
//! - Language registry and model resolution
//! - Translation with pretrained models served by a Hugging Face compatible hub
//! - Quality scoring through an external BLEURT service
//! - Speech output through a system synthesizer

pub mod config;
pub mod error;
pub mod language;
pub mod model;
pub mod pipeline;
pub mod quality;
pub mod speech;
pub mod util;

pub use config::{
    AppConfig, CacheConfig, ConfigOverrides, ModelStoreConfig, ScorerConfig, SpeechConfig,
};
pub use error::{Error, LoadError, Result};
pub use language::{Language, LanguageCode, LanguageRegistry, DEFAULT_SOURCE_LANGUAGE};
pub use model::{create_model_store, LoadedModel, ModelId, ModelResolver, ModelStore};
pub use pipeline::{TranslationPipeline, TranslationRequest, TranslationResult};
pub use quality::{BleurtClient, QualityScore, QualityScorer, ScoreBand, ScorerService, SCORE_LEGEND};
pub use speech::{create_speech_engine, CommandSpeech, SilentSpeech, SpeechEngine};

use std::sync::Arc;
use tracing::info;

/// Entry point for presentation layers, combining all components
pub struct TranslationEnhancer {
    pipeline: TranslationPipeline,
    speech: Arc<dyn SpeechEngine>,
    default_source: String,
}

impl TranslationEnhancer {
    /// Create the enhancer with the backends described by `config`
    pub fn new(config: &AppConfig) -> Result<Self> {
        config.validate()?;

        let store = create_model_store(&config.model_store, &config.cache)?;
        let scorer: Arc<dyn ScorerService> = Arc::new(BleurtClient::new(&config.scorer)?);
        let speech = create_speech_engine(&config.speech);

        info!(
            "Using {} for models, scorer at {}, speech via {}",
            store.name(),
            config.scorer.endpoint,
            speech.name()
        );

        Self::with_components(config, store, scorer, speech)
    }

    /// Create with custom backends
    pub fn with_components(
        config: &AppConfig,
        store: Arc<dyn ModelStore>,
        scorer: Arc<dyn ScorerService>,
        speech: Arc<dyn SpeechEngine>,
    ) -> Result<Self> {
        let registry = config.registry()?;
        let pipeline = TranslationPipeline::new(
            Arc::new(registry),
            ModelResolver::new(config.model_store.namespace.clone()),
            store,
            QualityScorer::new(scorer),
        );

        Ok(Self {
            pipeline,
            speech,
            default_source: config.default_source.clone(),
        })
    }

    /// Languages a text in `source` can be translated into
    pub fn valid_targets(&self, source: &str) -> Vec<&str> {
        self.pipeline.registry().valid_targets(source)
    }

    pub async fn translate(&self, request: &TranslationRequest) -> Result<TranslationResult> {
        self.pipeline.translate(request).await
    }

    /// Speak `text`, waiting for playback to finish. Never fails.
    pub async fn speak(&self, text: &str) {
        self.speech.speak(text).await;
    }

    pub fn languages(&self) -> &[Language] {
        self.pipeline.registry().languages()
    }

    pub const fn legend(&self) -> &'static str {
        SCORE_LEGEND
    }

    pub fn default_source(&self) -> &str {
        &self.default_source
    }

    /// Shared handle to the speech engine, for callers that speak in the background
    pub fn speech_engine(&self) -> Arc<dyn SpeechEngine> {
        Arc::clone(&self.speech)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_from_default_config() {
        let enhancer = TranslationEnhancer::new(&AppConfig::default()).unwrap();
        assert_eq!(enhancer.default_source(), "English");
        assert_eq!(enhancer.languages().len(), 7);
        assert_eq!(
            enhancer.valid_targets("English"),
            vec!["Spanish", "French", "German", "Hindi", "Telugu", "Tamil"]
        );
        assert!(enhancer.legend().starts_with("🔍 **BLEURT Score Legend**"));
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = AppConfig {
            default_source: "Latin".to_string(),
            ..Default::default()
        };
        assert!(TranslationEnhancer::new(&config).is_err());
    }
}
