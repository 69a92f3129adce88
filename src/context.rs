//! Application context
//!
//! Built once at startup by [`AppContext::create`] and passed to whatever
//! needs it. Nothing in the crate reads a store, model or event channel from
//! ambient global state; tests build contexts from fakes with
//! [`AppContext::from_parts`].

use std::sync::Arc;
use tracing::{info, warn};

use crate::app::config::AppConfig;
use crate::error::Result;
use crate::flow::{AnthropicModel, GenerativeModel, RecipeFlow};
use crate::identity::SessionRegistry;
use crate::orchestrator::{RequestOrchestrator, SavePolicy};
use crate::persistence::{PersistenceEvents, PersistenceGateway};
use crate::storage::{DocumentStore, StorageFactory};

#[derive(Clone)]
pub struct AppContext {
    store: Arc<dyn DocumentStore>,
    events: PersistenceEvents,
    persistence: PersistenceGateway,
    orchestrator: RequestOrchestrator,
    sessions: Arc<SessionRegistry>,
}

impl AppContext {
    /// Build the store, model and orchestrator described by `config`
    pub async fn create(config: &AppConfig) -> Result<Self> {
        let store =
            StorageFactory::from_config(&config.storage, config.save_policy.access_rules()).await?;
        let model: Arc<dyn GenerativeModel> = Arc::new(AnthropicModel::new(&config.model)?);

        if config.model.api_key.is_none() {
            warn!("No model API key configured; generation requests will fail");
        }

        info!(
            model = model.name(),
            policy = %config.save_policy,
            "Application context created"
        );

        let sessions = SessionRegistry::with_authenticated(config.identity.tokens.clone());

        Ok(Self::from_parts(
            store,
            model,
            PersistenceEvents::new(config.event_capacity),
            config.save_policy,
        )?
        .with_sessions(sessions))
    }

    /// Assemble a context from explicit collaborators
    pub fn from_parts(
        store: Arc<dyn DocumentStore>,
        model: Arc<dyn GenerativeModel>,
        events: PersistenceEvents,
        policy: SavePolicy,
    ) -> Result<Self> {
        let flow = RecipeFlow::new(model)?;
        let persistence = PersistenceGateway::new(store.clone(), events.clone());
        let orchestrator = RequestOrchestrator::new(flow, persistence.clone(), policy);

        Ok(Self {
            store,
            events,
            persistence,
            orchestrator,
            sessions: Arc::new(SessionRegistry::new()),
        })
    }

    /// Replace the session registry
    pub fn with_sessions(mut self, sessions: SessionRegistry) -> Self {
        self.sessions = Arc::new(sessions);
        self
    }

    pub fn orchestrator(&self) -> &RequestOrchestrator {
        &self.orchestrator
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    pub fn events(&self) -> &PersistenceEvents {
        &self.events
    }

    pub fn persistence(&self) -> &PersistenceGateway {
        &self.persistence
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StorageConfig;

    #[tokio::test]
    async fn test_create_with_memory_storage() {
        let config = AppConfig {
            storage: StorageConfig::memory(),
            ..AppConfig::default()
        };

        let context = AppContext::create(&config).await.unwrap();
        context.store().health_check().await.unwrap();
        assert!(context.sessions().is_empty().await);
        assert_eq!(context.orchestrator().policy(), SavePolicy::AuthenticatedOnly);
    }

    #[tokio::test]
    async fn test_missing_api_key_surfaces_as_generic_failure() {
        let mut config = AppConfig {
            storage: StorageConfig::memory(),
            ..AppConfig::default()
        };
        config.model.api_key = None;

        let context = AppContext::create(&config).await.unwrap();
        let response = context.orchestrator().generate(Some("kip, rijst")).await;
        assert!(response.data.is_none());
        assert_eq!(
            response.error.as_deref(),
            Some(crate::messages::GENERATION_FAILED)
        );
    }

    #[tokio::test]
    async fn test_configured_tokens_become_authenticated_sessions() {
        let mut config = AppConfig {
            storage: StorageConfig::memory(),
            ..AppConfig::default()
        };
        config
            .identity
            .tokens
            .insert("tok-1".to_string(), "u1".to_string());

        let context = AppContext::create(&config).await.unwrap();
        assert_eq!(
            context.sessions().lookup("tok-1").await,
            Some(crate::identity::Identity::authenticated("u1"))
        );
    }
}
