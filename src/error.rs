use thiserror::Error;

use crate::flow::GenerationError;
use crate::identity::IdentityError;
use crate::persistence::PersistenceError;
use crate::recipe::ValidationError;
use crate::storage::StorageError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Identity error: {0}")]
    Identity(#[from] IdentityError),
}

pub type Result<T> = std::result::Result<T, Error>;
