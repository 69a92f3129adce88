//! Core trait definitions for the storage abstraction layer

use async_trait::async_trait;

use super::error::StorageResult;
use super::types::{CollectionPath, NewDocument, StoredDocument};
use crate::identity::Identity;

/// Append-only document store
///
/// There are no update or delete operations. Each append creates a new
/// document with a store-assigned id, so concurrent appends never contend on
/// the same document.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Append a document to a collection on behalf of `principal`
    async fn append(
        &self,
        path: &CollectionPath,
        document: NewDocument,
        principal: Option<&Identity>,
    ) -> StorageResult<StoredDocument>;

    /// List the documents of a collection in insertion order
    async fn list(
        &self,
        path: &CollectionPath,
        principal: Option<&Identity>,
    ) -> StorageResult<Vec<StoredDocument>>;

    /// Check the health of the storage backend
    async fn health_check(&self) -> StorageResult<()>;
}
