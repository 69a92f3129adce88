//! Anonymous identity bootstrap
//!
//! `Unresolved -> Resolving -> Resolved | Unavailable`, driven by
//! [`IdentityResolver::resolve`]. Concurrent callers share one resolution, so
//! an absent identity triggers at most one anonymous sign-in.

use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, warn};

use super::{Identity, IdentityProvider};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionState {
    Unresolved,
    Resolving,
    Resolved(Identity),
    /// Anonymous sign-in failed; saving is unavailable for this absence
    Unavailable,
}

impl ResolutionState {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Resolved(identity) => Some(identity),
            _ => None,
        }
    }
}

pub struct IdentityResolver {
    provider: Arc<dyn IdentityProvider>,
    state: Mutex<ResolutionState>,
    gate: tokio::sync::Mutex<()>,
}

impl IdentityResolver {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self {
            provider,
            state: Mutex::new(ResolutionState::Unresolved),
            gate: tokio::sync::Mutex::new(()),
        }
    }

    pub fn state(&self) -> ResolutionState {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Identity resolved so far, if any
    pub fn identity(&self) -> Option<Identity> {
        self.state().identity().cloned()
    }

    fn set_state(&self, state: ResolutionState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state;
    }

    /// Ensure the session holds an identity
    ///
    /// Waits for the provider's initial load. An existing identity is kept
    /// as-is; only an absent one leads to an anonymous sign-in. A failed
    /// sign-in is logged and leaves the resolver `Unavailable` until
    /// [`observe`](Self::observe) reports a change.
    pub async fn resolve(&self) -> Option<Identity> {
        let _gate = self.gate.lock().await;

        match self.state() {
            ResolutionState::Resolved(identity) => return Some(identity),
            ResolutionState::Unavailable => return None,
            ResolutionState::Unresolved | ResolutionState::Resolving => {}
        }

        self.set_state(ResolutionState::Resolving);

        let next = match self.provider.current().await {
            Ok(Some(identity)) => {
                debug!(user_id = identity.id(), "Identity already present");
                ResolutionState::Resolved(identity)
            }
            Ok(None) => match self.provider.sign_in_anonymously().await {
                Ok(identity) => {
                    info!(user_id = identity.id(), "Created anonymous identity");
                    ResolutionState::Resolved(identity)
                }
                Err(e) => {
                    warn!("Anonymous sign-in failed, saving unavailable: {}", e);
                    ResolutionState::Unavailable
                }
            },
            Err(e) => {
                warn!("Identity provider failed to load, saving unavailable: {}", e);
                ResolutionState::Unavailable
            }
        };

        let identity = next.identity().cloned();
        self.set_state(next);
        identity
    }

    /// Record an identity change made outside the resolver
    ///
    /// A present identity (e.g. after sign-in) becomes the resolved one. A new
    /// absence resets the resolver so the next [`resolve`](Self::resolve)
    /// creates one anonymous identity for it.
    pub fn observe(&self, identity: Option<Identity>) {
        match identity {
            Some(identity) => self.set_state(ResolutionState::Resolved(identity)),
            None => self.set_state(ResolutionState::Unresolved),
        }
    }
}
