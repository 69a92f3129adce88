//! Runtime initialization and setup
//!
//! This module handles application startup: logging first, then the
//! application context, then the background listener for persistence events.

use crate::app::{config::AppConfig, logging::init_logging};
use crate::context::AppContext;
use crate::persistence::{PersistenceEvent, PersistenceEvents};
use anyhow::{Context, Result};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

/// Initialize the application with proper logging and configuration
pub async fn initialize_app(config: &AppConfig) -> Result<AppContext> {
    // Initialize logging first
    init_logging(config);

    let context = AppContext::create(config)
        .await
        .context("Failed to create application context")?;

    spawn_event_monitor(context.events());
    Ok(context)
}

/// Log persistence failures reported out of band
///
/// Permission denials point at misconfigured access rules rather than a
/// transient fault, so they get their own log line.
pub fn spawn_event_monitor(events: &PersistenceEvents) -> JoinHandle<()> {
    let mut rx = events.subscribe();

    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(PersistenceEvent::PermissionDenied {
                    user_id,
                    path,
                    reason,
                }) => {
                    error!(
                        user_id = ?user_id,
                        path = %path,
                        "Store rejected write by access rules: {}",
                        reason
                    );
                }
                Ok(event) if event.is_failure() => {
                    warn!(event = ?event, "Persistence failure");
                }
                Ok(event) => debug!(event = ?event, "Persistence event"),
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Persistence event monitor lagged, skipped {} events", skipped);
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}
