//! Caller identity
//!
//! An identity is absent, anonymous (system-issued) or authenticated. The
//! [`IdentityResolver`] makes sure a client holds at least an anonymous
//! identity before anything is saved, without ever replacing one it already
//! has.

pub mod provider;
pub mod resolver;
pub mod sessions;

pub use provider::{IdentityProvider, LocalIdentityProvider};
pub use resolver::{IdentityResolver, ResolutionState};
pub use sessions::{Session, SessionRegistry};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),

    #[error("anonymous sign-in failed: {0}")]
    SignInFailed(String),
}

/// A session principal
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    id: String,
    is_anonymous: bool,
}

impl Identity {
    pub fn anonymous(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            is_anonymous: true,
        }
    }

    pub fn authenticated(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            is_anonymous: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_anonymous(&self) -> bool {
        self.is_anonymous
    }
}
