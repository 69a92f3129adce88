//! Document stores that fail or stall on purpose

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::identity::Identity;
use crate::storage::{
    CollectionPath, DocumentStore, NewDocument, StorageError, StorageResult, StoredDocument,
};

#[derive(Debug, Clone, Copy)]
enum FailureKind {
    Unavailable,
    PermissionDenied,
}

/// Store that rejects every operation
pub struct FailingStore {
    kind: FailureKind,
    append_calls: AtomicUsize,
}

impl FailingStore {
    pub fn unavailable() -> Self {
        Self {
            kind: FailureKind::Unavailable,
            append_calls: AtomicUsize::new(0),
        }
    }

    pub fn permission_denied() -> Self {
        Self {
            kind: FailureKind::PermissionDenied,
            append_calls: AtomicUsize::new(0),
        }
    }

    pub fn append_calls(&self) -> usize {
        self.append_calls.load(Ordering::SeqCst)
    }

    fn error(&self, path: &CollectionPath) -> StorageError {
        match self.kind {
            FailureKind::Unavailable => StorageError::unavailable("store is offline"),
            FailureKind::PermissionDenied => {
                StorageError::permission_denied(path, "rules reject every request")
            }
        }
    }
}

#[async_trait]
impl DocumentStore for FailingStore {
    async fn append(
        &self,
        path: &CollectionPath,
        _document: NewDocument,
        _principal: Option<&Identity>,
    ) -> StorageResult<StoredDocument> {
        self.append_calls.fetch_add(1, Ordering::SeqCst);
        Err(self.error(path))
    }

    async fn list(
        &self,
        path: &CollectionPath,
        _principal: Option<&Identity>,
    ) -> StorageResult<Vec<StoredDocument>> {
        Err(self.error(path))
    }

    async fn health_check(&self) -> StorageResult<()> {
        Err(StorageError::unavailable("store is offline"))
    }
}

/// Store that delays every append before delegating
pub struct DelayedStore {
    inner: Arc<dyn DocumentStore>,
    delay: Duration,
}

impl DelayedStore {
    pub fn new(inner: Arc<dyn DocumentStore>, delay: Duration) -> Self {
        Self { inner, delay }
    }
}

#[async_trait]
impl DocumentStore for DelayedStore {
    async fn append(
        &self,
        path: &CollectionPath,
        document: NewDocument,
        principal: Option<&Identity>,
    ) -> StorageResult<StoredDocument> {
        tokio::time::sleep(self.delay).await;
        self.inner.append(path, document, principal).await
    }

    async fn list(
        &self,
        path: &CollectionPath,
        principal: Option<&Identity>,
    ) -> StorageResult<Vec<StoredDocument>> {
        self.inner.list(path, principal).await
    }

    async fn health_check(&self) -> StorageResult<()> {
        self.inner.health_check().await
    }
}
