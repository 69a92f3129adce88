//! HTTP surface
//!
//! Thin axum layer over the [`RequestOrchestrator`](crate::orchestrator::RequestOrchestrator).
//! Application outcomes travel inside the JSON envelopes with status 200;
//! only malformed requests are rejected at the HTTP level. The caller's
//! identity is looked up from the session behind an `Authorization: Bearer`
//! token issued by `POST /api/identity`.

pub mod handlers;

use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use std::future::Future;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

use crate::context::AppContext;

/// How long shutdown waits for history writes already dispatched
pub const HISTORY_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// API server for the recipe endpoints
pub struct ApiServer {
    context: AppContext,
    bind_address: String,
}

impl ApiServer {
    pub fn new(context: AppContext, bind_address: impl Into<String>) -> Self {
        Self {
            context,
            bind_address: bind_address.into(),
        }
    }

    /// Serve until `shutdown` resolves
    pub async fn run<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = tokio::net::TcpListener::bind(&self.bind_address)
            .await
            .with_context(|| format!("Failed to bind {}", self.bind_address))?;

        info!("Starting recipe API server on {}", self.bind_address);

        let persistence = self.context.persistence().clone();
        axum::serve(listener, build_router(self.context))
            .with_graceful_shutdown(shutdown)
            .await
            .context("Server error")?;

        let pending = persistence.pending_writes();
        if pending > 0 {
            info!("Waiting for {} history writes to finish", pending);
        }
        if !persistence.drain(HISTORY_DRAIN_TIMEOUT).await {
            warn!(
                "Gave up on {} history writes after {:?}",
                persistence.pending_writes(),
                HISTORY_DRAIN_TIMEOUT
            );
        }

        info!("Recipe API server stopped");
        Ok(())
    }
}

/// Build API router
pub fn build_router(context: AppContext) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/recipes/generate", post(handlers::generate_recipe))
        .route(
            "/api/favorites",
            post(handlers::save_favorite).get(handlers::list_favorites),
        )
        .route("/api/identity", post(handlers::resolve_identity))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(context)
}
