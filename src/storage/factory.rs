//! Storage factory for creating storage instances

use std::sync::Arc;
use tracing::info;

use super::backends::{FileStore, MemoryStore};
use super::config::{BackendType, StorageConfig};
use super::error::StorageResult;
use super::rules::AccessRules;
use super::traits::DocumentStore;

/// Factory for creating storage instances
pub struct StorageFactory;

impl StorageFactory {
    /// Create storage from explicit configuration
    pub async fn from_config(
        config: &StorageConfig,
        rules: AccessRules,
    ) -> StorageResult<Arc<dyn DocumentStore>> {
        match config.backend {
            BackendType::File => {
                info!("Using file storage at {}", config.data_dir.display());
                let backend = FileStore::new(&config.data_dir, rules).await?;
                Ok(Arc::new(backend))
            }
            BackendType::Memory => {
                info!("Using in-memory storage");
                Ok(Arc::new(MemoryStore::new(rules)))
            }
        }
    }
}
