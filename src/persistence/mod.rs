//! Persistence of generated recipes
//!
//! History writes are detached from the request that produced the recipe;
//! their outcome is only visible in the logs and on the
//! [`PersistenceEvents`] channel. Favorite saves are awaited by the caller
//! but report authorization failures on the same channel as well.

pub mod events;
pub mod gateway;
pub mod records;

pub use events::{PersistenceEvent, PersistenceEvents};
pub use gateway::PersistenceGateway;
pub use records::{FavoriteRecord, HistoryRecord};

use thiserror::Error;

use crate::storage::StorageError;

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("permission denied on {path}: {reason}")]
    PermissionDenied { path: String, reason: String },

    #[error("write failed: {0}")]
    Write(StorageError),

    #[error("read failed: {0}")]
    Read(StorageError),

    #[error("invalid document: {0}")]
    InvalidDocument(String),
}

impl PersistenceError {
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied { .. })
    }

    fn from_read(err: StorageError) -> Self {
        match err {
            StorageError::PermissionDenied { path, reason } => {
                Self::PermissionDenied { path, reason }
            }
            other => Self::Read(other),
        }
    }
}

impl From<StorageError> for PersistenceError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::PermissionDenied { path, reason } => {
                Self::PermissionDenied { path, reason }
            }
            other => Self::Write(other),
        }
    }
}
