//! Server-side sessions
//!
//! Clients hold an opaque bearer token; the identity behind it lives here and
//! is never taken from the request. New clients get an anonymous identity
//! through an [`IdentityResolver`]. Authenticated sessions come from an
//! external sign-in, either seeded at startup or upgraded with
//! [`SessionRegistry::sign_in`].

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use super::{Identity, IdentityError, IdentityResolver, LocalIdentityProvider};

/// A bearer token and the identity it stands for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub identity: Identity,
}

#[derive(Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, Identity>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry seeded with authenticated sessions, `token -> user id`
    pub fn with_authenticated<I, T, U>(tokens: I) -> Self
    where
        I: IntoIterator<Item = (T, U)>,
        T: Into<String>,
        U: Into<String>,
    {
        let sessions = tokens
            .into_iter()
            .map(|(token, user_id)| (token.into(), Identity::authenticated(user_id)))
            .collect();

        Self {
            sessions: RwLock::new(sessions),
        }
    }

    /// Identity behind `token`, if the session exists
    pub async fn lookup(&self, token: &str) -> Option<Identity> {
        self.sessions.read().await.get(token).cloned()
    }

    /// Return the caller's session, or open an anonymous one
    ///
    /// A known token keeps its identity unchanged. A missing or unknown token
    /// gets a fresh token and exactly one anonymous identity.
    pub async fn bootstrap(&self, token: Option<&str>) -> Result<Session, IdentityError> {
        if let Some(token) = token {
            if let Some(identity) = self.lookup(token).await {
                debug!(user_id = identity.id(), "Resumed session");
                return Ok(Session {
                    token: token.to_string(),
                    identity,
                });
            }
        }

        let resolver = IdentityResolver::new(Arc::new(LocalIdentityProvider::new()));
        let identity = resolver.resolve().await.ok_or_else(|| {
            IdentityError::Unavailable("no identity could be issued".to_string())
        })?;

        let token = Uuid::new_v4().simple().to_string();
        self.sessions
            .write()
            .await
            .insert(token.clone(), identity.clone());

        Ok(Session { token, identity })
    }

    /// Upgrade the session behind `token` after an external sign-in
    ///
    /// Returns `None` if there is no such session.
    pub async fn sign_in(&self, token: &str, user_id: impl Into<String>) -> Option<Identity> {
        let mut sessions = self.sessions.write().await;
        let identity = sessions.get_mut(token)?;
        *identity = Identity::authenticated(user_id);
        info!(user_id = identity.id(), "Session signed in");
        Some(identity.clone())
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bootstrap_issues_anonymous_session() {
        let registry = SessionRegistry::new();
        assert!(registry.is_empty().await);

        let session = registry.bootstrap(None).await.unwrap();
        assert!(session.identity.is_anonymous());
        assert!(!session.token.is_empty());
        assert_eq!(registry.lookup(&session.token).await, Some(session.identity));
    }

    #[tokio::test]
    async fn test_bootstrap_keeps_known_session() {
        let registry = SessionRegistry::with_authenticated([("tok-1", "u1")]);

        let session = registry.bootstrap(Some("tok-1")).await.unwrap();
        assert_eq!(session.token, "tok-1");
        assert_eq!(session.identity, Identity::authenticated("u1"));
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_unknown_token_gets_new_session() {
        let registry = SessionRegistry::new();

        let session = registry.bootstrap(Some("forged")).await.unwrap();
        assert_ne!(session.token, "forged");
        assert!(session.identity.is_anonymous());
        assert!(registry.lookup("forged").await.is_none());
    }

    #[tokio::test]
    async fn test_sign_in_upgrades_existing_session_only() {
        let registry = SessionRegistry::new();
        let session = registry.bootstrap(None).await.unwrap();

        let upgraded = registry.sign_in(&session.token, "u9").await.unwrap();
        assert_eq!(upgraded, Identity::authenticated("u9"));
        assert_eq!(registry.lookup(&session.token).await, Some(upgraded));

        assert!(registry.sign_in("missing", "u9").await.is_none());
        assert_eq!(registry.len().await, 1);
    }
}
