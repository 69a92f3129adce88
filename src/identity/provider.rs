//! Identity provider abstraction and a local implementation

use async_trait::async_trait;
use std::sync::{Mutex, PoisonError};
use tokio::sync::watch;
use tracing::debug;
use uuid::Uuid;

use super::{Identity, IdentityError};

/// Source of the current identity
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Current identity, available once the provider finished its initial load
    ///
    /// Implementations wait for an in-flight load instead of reporting absence
    /// early.
    async fn current(&self) -> Result<Option<Identity>, IdentityError>;

    /// Create an anonymous identity and make it current
    async fn sign_in_anonymously(&self) -> Result<Identity, IdentityError>;
}

/// In-process provider that issues UUID identities
pub struct LocalIdentityProvider {
    current: Mutex<Option<Identity>>,
    loaded: watch::Sender<bool>,
}

impl Default for LocalIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalIdentityProvider {
    /// Provider with no identity and nothing left to load
    pub fn new() -> Self {
        Self::restored(None)
    }

    /// Provider that resumes a previously issued identity
    pub fn restored(identity: Option<Identity>) -> Self {
        let (loaded, _) = watch::channel(true);
        Self {
            current: Mutex::new(identity),
            loaded,
        }
    }

    /// Provider whose initial load is still in flight
    pub fn loading() -> Self {
        let (loaded, _) = watch::channel(false);
        Self {
            current: Mutex::new(None),
            loaded,
        }
    }

    /// Complete the initial load
    pub fn finish_loading(&self, identity: Option<Identity>) {
        self.set(identity);
        self.loaded.send_replace(true);
    }

    /// Upgrade to an authenticated identity after an external sign-in
    pub fn sign_in(&self, user_id: impl Into<String>) -> Identity {
        let identity = Identity::authenticated(user_id);
        self.set(Some(identity.clone()));
        identity
    }

    fn get(&self) -> Option<Identity> {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set(&self, identity: Option<Identity>) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = identity;
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    async fn current(&self) -> Result<Option<Identity>, IdentityError> {
        let mut loaded = self.loaded.subscribe();
        loaded
            .wait_for(|done| *done)
            .await
            .map_err(|e| IdentityError::Unavailable(e.to_string()))?;

        Ok(self.get())
    }

    async fn sign_in_anonymously(&self) -> Result<Identity, IdentityError> {
        let identity = Identity::anonymous(Uuid::new_v4().to_string());
        debug!(user_id = identity.id(), "Issued anonymous identity");
        self.set(Some(identity.clone()));
        Ok(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_restored_identity_is_current() {
        let provider = LocalIdentityProvider::restored(Some(Identity::authenticated("u1")));
        assert_eq!(
            provider.current().await.unwrap(),
            Some(Identity::authenticated("u1"))
        );
    }

    #[tokio::test]
    async fn test_anonymous_sign_in_issues_unique_ids() {
        let provider = LocalIdentityProvider::new();
        let first = provider.sign_in_anonymously().await.unwrap();
        let second = provider.sign_in_anonymously().await.unwrap();

        assert!(first.is_anonymous());
        assert_ne!(first.id(), second.id());
        assert_eq!(provider.current().await.unwrap(), Some(second));
    }

    #[tokio::test]
    async fn test_current_waits_for_load() {
        let provider = Arc::new(LocalIdentityProvider::loading());

        let waiter = {
            let provider = provider.clone();
            tokio::spawn(async move { provider.current().await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        provider.finish_loading(Some(Identity::authenticated("late")));
        let identity = waiter.await.unwrap().unwrap();
        assert_eq!(identity, Some(Identity::authenticated("late")));
    }

    #[tokio::test]
    async fn test_sign_in_upgrades() {
        let provider = LocalIdentityProvider::new();
        provider.sign_in_anonymously().await.unwrap();
        let upgraded = provider.sign_in("u9");
        assert!(!upgraded.is_anonymous());
        assert_eq!(provider.current().await.unwrap(), Some(upgraded));
    }
}
