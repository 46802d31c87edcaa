use async_trait::async_trait;
use std::sync::Arc;

use crate::error::{LoadError, Result};
use super::resolver::ModelId;

/// Information about a model store backend
#[derive(Debug, Clone)]
pub struct ModelStoreInfo {
    /// Human-readable name
    pub name: &'static str,
}

/// A translation model ready to run.
///
/// Tokenization, generation and decoding (with special tokens skipped) all
/// happen behind `generate`; callers only see text in and text out.
#[async_trait]
pub trait LoadedModel: Send + Sync {
    /// Identifier the model was loaded under
    fn id(&self) -> &ModelId;

    /// Translate `text`. Deterministic for a given input.
    async fn generate(&self, text: &str) -> Result<String>;
}

/// Source of translation models keyed by [`ModelId`]
#[async_trait]
pub trait ModelStore: Send + Sync {
    /// Get information about this store
    fn info(&self) -> ModelStoreInfo;

    /// Get the store name (convenience method)
    fn name(&self) -> &'static str {
        self.info().name
    }

    /// Acquire a model, or report why none is available
    async fn load(&self, id: &ModelId) -> std::result::Result<Arc<dyn LoadedModel>, LoadError>;
}
