//! File-based storage backend
//!
//! Each collection is a JSON-lines file; the collection path maps onto the
//! directory layout, e.g. `users/<uid>/favorites.jsonl`.

use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::identity::Identity;
use crate::storage::{
    error::{StorageError, StorageResult},
    rules::AccessRules,
    traits::DocumentStore,
    types::{CollectionPath, NewDocument, StoredDocument},
};

/// File-based storage backend
pub struct FileStore {
    base_dir: PathBuf,
    rules: AccessRules,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Create a new file backend, creating `base_dir` if needed
    pub async fn new(base_dir: impl Into<PathBuf>, rules: AccessRules) -> StorageResult<Self> {
        let base_dir = base_dir.into();
        fs::create_dir_all(&base_dir).await?;

        Ok(Self {
            base_dir,
            rules,
            write_lock: Mutex::new(()),
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn collection_file(&self, path: &CollectionPath) -> PathBuf {
        let mut file = self.base_dir.clone();
        for segment in path.segments() {
            file.push(segment);
        }
        file.set_extension("jsonl");
        file
    }
}

#[async_trait]
impl DocumentStore for FileStore {
    async fn append(
        &self,
        path: &CollectionPath,
        document: NewDocument,
        principal: Option<&Identity>,
    ) -> StorageResult<StoredDocument> {
        path.validate()?;
        self.rules.check(path, principal)?;

        let stored = document.into_stored(path, Utc::now());
        let line = serde_json::to_string(&stored)?;
        let file_path = self.collection_file(path);

        let _guard = self.write_lock.lock().await;
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&file_path)
            .await?;
        file.write_all((line + "\n").as_bytes()).await?;
        file.flush().await?;

        debug!(path = %path, doc_id = %stored.id, "Appended document");
        Ok(stored)
    }

    async fn list(
        &self,
        path: &CollectionPath,
        principal: Option<&Identity>,
    ) -> StorageResult<Vec<StoredDocument>> {
        path.validate()?;
        self.rules.check(path, principal)?;

        let file_path = self.collection_file(path);
        let file = match fs::File::open(&file_path).await {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StorageError::Io(e)),
        };

        let mut documents = Vec::new();
        let mut lines = BufReader::new(file).lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<StoredDocument>(&line) {
                Ok(doc) => documents.push(doc),
                Err(e) => warn!(path = %path, "Skipping unreadable document: {}", e),
            }
        }

        Ok(documents)
    }

    async fn health_check(&self) -> StorageResult<()> {
        let metadata = fs::metadata(&self.base_dir).await?;
        if metadata.is_dir() {
            Ok(())
        } else {
            Err(StorageError::unavailable(format!(
                "{} is not a directory",
                self.base_dir.display()
            )))
        }
    }
}
