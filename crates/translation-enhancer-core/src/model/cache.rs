use async_trait::async_trait;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::config::CacheConfig;
use crate::error::LoadError;
use super::resolver::ModelId;
use super::traits::{LoadedModel, ModelStore, ModelStoreInfo};

/// In-memory cache of loaded models in front of another store.
///
/// Only successful loads are kept, so an unavailable pair is asked for again
/// on the next request. Two requests racing on the same id may both load it;
/// the later insert simply replaces an equivalent handle.
pub struct CachedModelStore {
    inner: Arc<dyn ModelStore>,
    cache: Cache<ModelId, Arc<dyn LoadedModel>>,
}

impl CachedModelStore {
    pub fn new(inner: Arc<dyn ModelStore>, max_models: u64, ttl_seconds: u64) -> Self {
        let mut builder = Cache::builder().max_capacity(max_models);

        if ttl_seconds > 0 {
            builder = builder.time_to_live(Duration::from_secs(ttl_seconds));
        }

        Self {
            inner,
            cache: builder.build(),
        }
    }

    pub fn from_config(inner: Arc<dyn ModelStore>, config: &CacheConfig) -> Self {
        Self::new(inner, config.max_models, config.ttl_seconds)
    }

    pub fn clear(&self) {
        self.cache.invalidate_all();
    }
}

#[async_trait]
impl ModelStore for CachedModelStore {
    fn info(&self) -> ModelStoreInfo {
        self.inner.info()
    }

    async fn load(
            &self,
            id: &ModelId,
        ) -> std::result::Result<Arc<dyn LoadedModel>, LoadError> {
        if let Some(model) = self.cache.get(id).await {
            debug!("Model cache hit for {}", id);
            return Ok(model);
        }

        let model = self.inner.load(id).await?;
        self.cache.insert(id.clone(), Arc::clone(&model)).await;
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct EchoModel {
        id: ModelId,
    }

    #[async_trait]
    impl LoadedModel for EchoModel {
        fn id(&self) -> &ModelId {
            &self.id
        }

        async fn generate(&self, text: &str) -> Result<String> {
            Ok(text.to_string())
        }
    }

    /// Counts loads; fails for ids ending in "-xx"
    #[derive(Default)]
    struct CountingStore {
        loads: AtomicUsize,
    }

    #[async_trait]
    impl ModelStore for CountingStore {
        fn info(&self) -> ModelStoreInfo {
            ModelStoreInfo { name: "counting" }
        }

        async fn load(
            &self,
            id: &ModelId,
        ) -> std::result::Result<Arc<dyn LoadedModel>, LoadError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            if id.as_str().ends_with("-xx") {
                return Err(LoadError::NotFound(id.clone()));
            }
            Ok(Arc::new(EchoModel { id: id.clone() }))
        }
    }

    #[tokio::test]
    async fn test_second_load_hits_cache() {
        let inner = Arc::new(CountingStore::default());
        let store = CachedModelStore::new(Arc::clone(&inner) as Arc<dyn ModelStore>, 4, 0);
        let id = ModelId::new("ns-en-es");

        let first = store.load(&id).await.unwrap();
        let second = store.load(&id).await.unwrap();

        assert_eq!(inner.loads.load(Ordering::SeqCst), 1);
        assert_eq!(first.id(), second.id());
        assert_eq!(store.name(), "counting");
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let inner = Arc::new(CountingStore::default());
        let store = CachedModelStore::new(Arc::clone(&inner) as Arc<dyn ModelStore>, 4, 0);
        let id = ModelId::new("ns-en-xx");

        assert!(store.load(&id).await.is_err());
        assert!(store.load(&id).await.is_err());
        assert_eq!(inner.loads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_clear_forces_reload() {
        let inner = Arc::new(CountingStore::default());
        let store = CachedModelStore::new(Arc::clone(&inner) as Arc<dyn ModelStore>, 4, 0);
        let id = ModelId::new("ns-fr-de");

        store.load(&id).await.unwrap();
        store.clear();
        store.load(&id).await.unwrap();

        assert_eq!(inner.loads.load(Ordering::SeqCst), 2);
    }
}
