use anyhow::Result;
use std::sync::Arc;
use translation_enhancer_core::{AppConfig, SpeechEngine, TranslationEnhancer};

/// Application state shared by all handlers
pub struct AppState {
    enhancer: TranslationEnhancer,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Result<Self> {
        Ok(Self::with_enhancer(TranslationEnhancer::new(config)?))
    }

    pub const fn with_enhancer(enhancer: TranslationEnhancer) -> Self {
        Self { enhancer }
    }

    pub const fn enhancer(&self) -> &TranslationEnhancer {
        &self.enhancer
    }

    /// Speak `text` on a background task so the request returns immediately.
    ///
    /// Playback requests are not queued or cancelled; overlapping requests
    /// play concurrently if the synthesizer allows it.
    pub fn speak_in_background(&self, text: String) {
        let engine: Arc<dyn SpeechEngine> = self.enhancer.speech_engine();
        tokio::spawn(async move {
            engine.speak(&text).await;
        });
    }
}
