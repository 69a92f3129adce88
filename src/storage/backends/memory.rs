//! In-memory storage backend

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::identity::Identity;
use crate::storage::{
    error::StorageResult,
    rules::AccessRules,
    traits::DocumentStore,
    types::{CollectionPath, NewDocument, StoredDocument},
};

/// In-memory storage backend
#[derive(Default)]
pub struct MemoryStore {
    rules: AccessRules,
    collections: RwLock<HashMap<CollectionPath, Vec<StoredDocument>>>,
}

impl MemoryStore {
    pub fn new(rules: AccessRules) -> Self {
        Self {
            rules,
            collections: RwLock::new(HashMap::new()),
        }
    }

    /// Number of documents in a collection, bypassing access rules
    pub async fn len(&self, path: &CollectionPath) -> usize {
        self.collections
            .read()
            .await
            .get(path)
            .map_or(0, Vec::len)
    }

    pub async fn is_empty(&self, path: &CollectionPath) -> bool {
        self.len(path).await == 0
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn append(
        &self,
        path: &CollectionPath,
        document: NewDocument,
        principal: Option<&Identity>,
    ) -> StorageResult<StoredDocument> {
        path.validate()?;
        self.rules.check(path, principal)?;

        let stored = document.into_stored(path, Utc::now());
        self.collections
            .write()
            .await
            .entry(path.clone())
            .or_default()
            .push(stored.clone());

        Ok(stored)
    }

    async fn list(
        &self,
        path: &CollectionPath,
        principal: Option<&Identity>,
    ) -> StorageResult<Vec<StoredDocument>> {
        path.validate()?;
        self.rules.check(path, principal)?;

        Ok(self
            .collections
            .read()
            .await
            .get(path)
            .cloned()
            .unwrap_or_default())
    }

    async fn health_check(&self) -> StorageResult<()> {
        Ok(())
    }
}
