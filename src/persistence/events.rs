//! Out-of-band reporting for persistence outcomes

use serde::Serialize;
use tokio::sync::broadcast;
use tracing::trace;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PersistenceEvent {
    HistoryRecorded {
        doc_id: String,
    },
    HistoryFailed {
        error: String,
    },
    FavoriteSaved {
        user_id: String,
        doc_id: String,
    },
    FavoriteFailed {
        user_id: String,
        error: String,
    },
    /// The store's access rules rejected an operation
    PermissionDenied {
        user_id: Option<String>,
        path: String,
        reason: String,
    },
}

impl PersistenceEvent {
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::HistoryFailed { .. } | Self::FavoriteFailed { .. } | Self::PermissionDenied { .. }
        )
    }
}

/// Broadcast channel for [`PersistenceEvent`]s
#[derive(Debug, Clone)]
pub struct PersistenceEvents {
    sender: broadcast::Sender<PersistenceEvent>,
}

impl Default for PersistenceEvents {
    fn default() -> Self {
        Self::new(256)
    }
}

impl PersistenceEvents {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PersistenceEvent> {
        self.sender.subscribe()
    }

    /// Publish an event; having no subscribers is fine
    pub fn publish(&self, event: PersistenceEvent) {
        if self.sender.send(event).is_err() {
            trace!("No persistence event subscribers");
        }
    }
}
