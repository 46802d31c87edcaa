//! Translation request pipeline.
//!
//! validate → map names to codes → resolve model → load → generate → score.
//! Missing input and unavailable models are folded into a result the user can
//! read; inference and scoring failures abort the request with an error.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::language::LanguageRegistry;
use crate::model::{ModelId, ModelResolver, ModelStore};
use crate::quality::{QualityScore, QualityScorer};

/// One translation request as submitted by the user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranslationRequest {
    pub text: String,
    /// Source language name
    pub source: Option<String>,
    /// Target language name
    pub target: Option<String>,
}

impl TranslationRequest {
    pub fn new(
        text: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            source: Some(source.into()),
            target: Some(target.into()),
        }
    }

    /// Source and target, if both are set and non-empty
    fn languages(&self) -> Option<(&str, &str)> {
        let source = self.source.as_deref().filter(|s| !s.is_empty())?;
        let target = self.target.as_deref().filter(|t| !t.is_empty())?;
        Some((source, target))
    }
}

/// Outcome of a translation request.
///
/// On failure `translated_text` is empty and `quality` carries the message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranslationResult {
    pub translated_text: String,
    pub quality: QualityScore,
    /// Model that produced the translation
    pub model: Option<ModelId>,
}

impl TranslationResult {
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            translated_text: String::new(),
            quality: QualityScore::Unavailable(message.into()),
            model: None,
        }
    }

    pub const fn is_success(&self) -> bool {
        matches!(self.quality, QualityScore::Score(_))
    }
}

impl From<Error> for TranslationResult {
    fn from(err: Error) -> Self {
        Self::failed(err.to_string())
    }
}

/// Runs translation requests against a model store and a quality scorer.
#[derive(Clone)]
pub struct TranslationPipeline {
    registry: Arc<LanguageRegistry>,
    resolver: ModelResolver,
    store: Arc<dyn ModelStore>,
    scorer: QualityScorer,
}

impl TranslationPipeline {
    pub fn new(
        registry: Arc<LanguageRegistry>,
        resolver: ModelResolver,
        store: Arc<dyn ModelStore>,
        scorer: QualityScorer,
    ) -> Self {
        Self {
            registry,
            resolver,
            store,
            scorer,
        }
    }

    pub fn registry(&self) -> &LanguageRegistry {
        &self.registry
    }

    pub async fn translate(&self, request: &TranslationRequest) -> Result<TranslationResult> {
        match self.run(request).await {
            Err(e) if e.is_recoverable() => Ok(TranslationResult::from(e)),
            other => other,
        }
    }

    async fn run(&self, request: &TranslationRequest) -> Result<TranslationResult> {
        let Some((source, target)) = request.languages() else {
            return Err(Error::MissingInput);
        };
        if request.text.is_empty() {
            return Err(Error::MissingInput);
        }

        let source_code = self.registry.code_for(source)?;
        let target_code = self.registry.code_for(target)?;
        let model_id = self.resolver.resolve(source_code, target_code);
        debug!("Resolved {} → {} to {}", source, target, model_id);

        let model = self.store.load(&model_id).await.map_err(|cause| {
            if cause.is_unsupported_pair() {
                warn!("No model published for {} → {}: {}", source, target, cause);
            } else {
                warn!("Model {} unavailable from {}: {}", model_id, self.store.name(), cause);
            }
            Error::ModelUnavailable {
                from: source.to_string(),
                to: target.to_string(),
                cause,
            }
        })?;

        let translated_text = model.generate(&request.text).await?;
        debug!("{} produced {} chars", model_id, translated_text.chars().count());

        let score = self.scorer.score(&request.text, &translated_text).await?;

        info!("Translated {} → {} with {} (score {})", source, target, model_id, score);

        Ok(TranslationResult {
            translated_text,
            quality: QualityScore::Score(score),
            model: Some(model_id),
        })
    }
}
