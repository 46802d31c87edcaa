mod cache;
mod hub;
mod resolver;
mod traits;

pub use cache::CachedModelStore;
pub use hub::{HubModel, HubModelStore};
pub use resolver::{ModelId, ModelResolver, DEFAULT_MODEL_NAMESPACE};
pub use traits::{LoadedModel, ModelStore, ModelStoreInfo};

use crate::config::{CacheConfig, ModelStoreConfig};
use crate::error::Result;
use std::sync::Arc;

/// Create a model store from configuration, cached in memory when enabled
pub fn create_model_store(
    config: &ModelStoreConfig,
    cache: &CacheConfig,
) -> Result<Arc<dyn ModelStore>> {
    let store: Arc<dyn ModelStore> = Arc::new(HubModelStore::new(config)?);

    if cache.models_enabled {
        Ok(Arc::new(CachedModelStore::from_config(store, cache)))
    } else {
        Ok(store)
    }
}
