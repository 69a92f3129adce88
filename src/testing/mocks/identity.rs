//! Identity provider that counts sign-ins

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

use crate::identity::{Identity, IdentityError, IdentityProvider};

pub struct CountingIdentityProvider {
    identity: Mutex<Option<Identity>>,
    failure: Option<IdentityError>,
    sign_in_calls: AtomicUsize,
}

impl CountingIdentityProvider {
    pub fn with_identity(identity: Option<Identity>) -> Self {
        Self {
            identity: Mutex::new(identity),
            failure: None,
            sign_in_calls: AtomicUsize::new(0),
        }
    }

    /// Make every anonymous sign-in fail with `error`
    pub fn failing(mut self, error: IdentityError) -> Self {
        self.failure = Some(error);
        self
    }

    pub fn sign_in_calls(&self) -> usize {
        self.sign_in_calls.load(Ordering::SeqCst)
    }

    /// Simulate a sign-out
    pub fn clear(&self) {
        *self.identity.lock().unwrap() = None;
    }
}

#[async_trait]
impl IdentityProvider for CountingIdentityProvider {
    async fn current(&self) -> Result<Option<Identity>, IdentityError> {
        Ok(self.identity.lock().unwrap().clone())
    }

    async fn sign_in_anonymously(&self) -> Result<Identity, IdentityError> {
        self.sign_in_calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;

        if let Some(error) = &self.failure {
            return Err(error.clone());
        }

        let identity = Identity::anonymous(Uuid::new_v4().to_string());
        *self.identity.lock().unwrap() = Some(identity.clone());
        Ok(identity)
    }
}
