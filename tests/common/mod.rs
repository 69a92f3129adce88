//! Common test utilities and helpers

#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::response::Response;
use souschef::identity::SessionRegistry;
use souschef::orchestrator::SavePolicy;
use souschef::persistence::{PersistenceEvent, PersistenceEvents};
use souschef::storage::{DocumentStore, MemoryStore};
use souschef::testing::ScriptedModel;
use souschef::AppContext;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::Receiver;

const BODY_LIMIT: usize = 1_048_576;

/// Test context builder with in-memory collaborators
pub struct TestContextBuilder {
    model: ScriptedModel,
    store: Option<Arc<dyn DocumentStore>>,
    policy: SavePolicy,
    sessions: Vec<(String, String)>,
}

impl TestContextBuilder {
    pub fn new() -> Self {
        Self {
            model: ScriptedModel::new(),
            store: None,
            policy: SavePolicy::AuthenticatedOnly,
            sessions: Vec::new(),
        }
    }

    /// Register an authenticated session for `user_id` behind `token`
    pub fn with_session(mut self, token: &str, user_id: &str) -> Self {
        self.sessions.push((token.to_string(), user_id.to_string()));
        self
    }

    pub fn with_model(mut self, model: ScriptedModel) -> Self {
        self.model = model;
        self
    }

    pub fn with_store(mut self, store: Arc<dyn DocumentStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_policy(mut self, policy: SavePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Build the context, returning the model so calls can be counted
    pub fn build(self) -> (AppContext, Arc<ScriptedModel>) {
        let model = Arc::new(self.model);
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemoryStore::new(self.policy.access_rules())));
        let context =
            AppContext::from_parts(store, model.clone(), PersistenceEvents::new(32), self.policy)
                .expect("context")
                .with_sessions(SessionRegistry::with_authenticated(self.sessions));
        (context, model)
    }
}

/// Wait for the next persistence event
pub async fn next_event(rx: &mut Receiver<PersistenceEvent>) -> PersistenceEvent {
    tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("event within timeout")
        .expect("channel open")
}

pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), BODY_LIMIT)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("parse json")
}
