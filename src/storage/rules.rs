//! Access rules evaluated by every backend before a read or write

use serde::{Deserialize, Serialize};

use super::error::{StorageError, StorageResult};
use super::types::CollectionPath;
use crate::identity::Identity;

/// Rule for one kind of collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "rule")]
pub enum AccessRule {
    /// Anyone, including requests without an identity
    Open,
    /// Only the identity the collection is scoped to
    OwnerOnly { allow_anonymous: bool },
}

/// Rules for the unscoped and the user-scoped collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRules {
    pub unscoped: AccessRule,
    pub user_scoped: AccessRule,
}

impl Default for AccessRules {
    fn default() -> Self {
        Self::owner_scoped(false)
    }
}

impl AccessRules {
    /// Unscoped collections are open, user collections belong to their owner
    pub fn owner_scoped(allow_anonymous: bool) -> Self {
        Self {
            unscoped: AccessRule::Open,
            user_scoped: AccessRule::OwnerOnly { allow_anonymous },
        }
    }

    /// No restrictions at all
    pub fn open() -> Self {
        Self {
            unscoped: AccessRule::Open,
            user_scoped: AccessRule::Open,
        }
    }

    pub fn check(&self, path: &CollectionPath, principal: Option<&Identity>) -> StorageResult<()> {
        let (rule, owner) = match path.owner() {
            Some(owner) => (self.user_scoped, Some(owner)),
            None => (self.unscoped, None),
        };

        match rule {
            AccessRule::Open => Ok(()),
            AccessRule::OwnerOnly { allow_anonymous } => {
                let principal = principal
                    .ok_or_else(|| StorageError::permission_denied(path, "no identity"))?;

                if principal.is_anonymous() && !allow_anonymous {
                    return Err(StorageError::permission_denied(
                        path,
                        "anonymous identities may not access this collection",
                    ));
                }

                match owner {
                    Some(owner) if owner == principal.id() => Ok(()),
                    Some(_) => Err(StorageError::permission_denied(
                        path,
                        format!("identity {} does not own this collection", principal.id()),
                    )),
                    // An owner-only rule on an unscoped collection admits nobody
                    None => Err(StorageError::permission_denied(path, "collection has no owner")),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_is_open() {
        let rules = AccessRules::default();
        assert!(rules.check(&CollectionPath::history(), None).is_ok());
    }

    #[test]
    fn test_favorites_require_matching_owner() {
        let rules = AccessRules::default();
        let path = CollectionPath::favorites("u1");

        assert!(rules
            .check(&path, Some(&Identity::authenticated("u1")))
            .is_ok());

        let err = rules
            .check(&path, Some(&Identity::authenticated("u2")))
            .unwrap_err();
        assert!(err.is_permission_denied());

        assert!(rules.check(&path, None).unwrap_err().is_permission_denied());
    }

    #[test]
    fn test_anonymous_owner_depends_on_rule() {
        let path = CollectionPath::favorites("anon-1");
        let anon = Identity::anonymous("anon-1");

        assert!(AccessRules::owner_scoped(false)
            .check(&path, Some(&anon))
            .unwrap_err()
            .is_permission_denied());
        assert!(AccessRules::owner_scoped(true)
            .check(&path, Some(&anon))
            .is_ok());
    }

    #[test]
    fn test_open_rules_admit_everyone() {
        let rules = AccessRules::open();
        assert!(rules.check(&CollectionPath::favorites("u1"), None).is_ok());
    }
}
