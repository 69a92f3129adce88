//! Who may save favorites

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::identity::Identity;
use crate::storage::AccessRules;

/// Authorization policy for favorite saves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SavePolicy {
    /// Only authenticated identities may save
    #[default]
    AuthenticatedOnly,
    /// Any present identity, anonymous included, may save
    AllowAnonymous,
}

impl SavePolicy {
    /// Whether `identity` may save favorites
    pub fn permits(&self, identity: Option<&Identity>) -> bool {
        match (self, identity) {
            (_, None) => false,
            (Self::AuthenticatedOnly, Some(identity)) => !identity.is_anonymous(),
            (Self::AllowAnonymous, Some(_)) => true,
        }
    }

    /// Store access rules matching this policy
    pub fn access_rules(&self) -> AccessRules {
        AccessRules::owner_scoped(matches!(self, Self::AllowAnonymous))
    }
}

impl fmt::Display for SavePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AuthenticatedOnly => f.write_str("authenticated_only"),
            Self::AllowAnonymous => f.write_str("allow_anonymous"),
        }
    }
}

impl FromStr for SavePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "authenticated_only" => Ok(Self::AuthenticatedOnly),
            "allow_anonymous" => Ok(Self::AllowAnonymous),
            other => Err(format!("unknown save policy '{other}'")),
        }
    }
}
