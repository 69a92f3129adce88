//! Storage abstraction layer
//!
//! An append-only document store with a flat history collection and
//! per-user favorites sub-collections. Backends stamp server timestamps
//! with their own clock and enforce [`AccessRules`] on every call.

pub mod backends;
pub mod config;
pub mod error;
pub mod factory;
pub mod rules;
pub mod traits;
pub mod types;


pub use backends::{FileStore, MemoryStore};
pub use config::{BackendType, StorageConfig};
pub use error::{StorageError, StorageResult};
pub use factory::StorageFactory;
pub use rules::{AccessRule, AccessRules};
pub use traits::DocumentStore;
pub use types::{CollectionPath, NewDocument, StoredDocument};
