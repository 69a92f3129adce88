//! Writes and reads of history and favorites

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use super::events::{PersistenceEvent, PersistenceEvents};
use super::records::{
    FavoriteRecord, HistoryRecord, FAVORITE_TIMESTAMP_FIELD, HISTORY_TIMESTAMP_FIELD,
};
use super::PersistenceError;
use crate::identity::Identity;
use crate::recipe::{FavoriteRecipe, Recipe, SaveRecipeRequest};
use crate::storage::{CollectionPath, DocumentStore, NewDocument, StorageError, StoredDocument};

/// Gateway between the request pipeline and the document store
#[derive(Clone)]
pub struct PersistenceGateway {
    store: Arc<dyn DocumentStore>,
    events: PersistenceEvents,
    in_flight: Arc<watch::Sender<usize>>,
}

/// Counts one dispatched history write until its task ends or is dropped
struct InFlightWrite(Arc<watch::Sender<usize>>);

impl InFlightWrite {
    fn start(counter: &Arc<watch::Sender<usize>>) -> Self {
        counter.send_modify(|n| *n += 1);
        Self(counter.clone())
    }
}

impl Drop for InFlightWrite {
    fn drop(&mut self) {
        self.0.send_modify(|n| *n = n.saturating_sub(1));
    }
}

impl PersistenceGateway {
    pub fn new(store: Arc<dyn DocumentStore>, events: PersistenceEvents) -> Self {
        let (in_flight, _) = watch::channel(0);
        Self {
            store,
            events,
            in_flight: Arc::new(in_flight),
        }
    }

    pub fn events(&self) -> &PersistenceEvents {
        &self.events
    }

    /// Number of history writes dispatched but not yet finished
    pub fn pending_writes(&self) -> usize {
        *self.in_flight.borrow()
    }

    /// Wait until every dispatched history write has finished
    ///
    /// Returns `false` if writes were still running when `timeout` elapsed.
    pub async fn drain(&self, timeout: Duration) -> bool {
        let mut rx = self.in_flight.subscribe();
        let idle = tokio::time::timeout(timeout, async move {
            rx.wait_for(|pending| *pending == 0).await.is_ok()
        })
        .await;
        matches!(idle, Ok(true))
    }

    /// Append a history record on a background task
    ///
    /// Never fails from the caller's point of view. The returned handle may
    /// be dropped; the write continues either way and its outcome is logged
    /// and published on the event channel.
    pub fn record_history(&self, ingredients: &str, recipe: &Recipe) -> JoinHandle<()> {
        let store = self.store.clone();
        let events = self.events.clone();
        let record = HistoryRecord::new(ingredients, recipe);
        let in_flight = InFlightWrite::start(&self.in_flight);

        tokio::spawn(async move {
            let _in_flight = in_flight;
            let outcome = match record {
                Ok(record) => match NewDocument::from_serializable(&record) {
                    Ok(document) => {
                        let document = document.with_server_timestamp(HISTORY_TIMESTAMP_FIELD);
                        store
                            .append(&CollectionPath::history(), document, None)
                            .await
                    }
                    Err(e) => Err(e),
                },
                Err(e) => Err(e.into()),
            };

            match outcome {
                Ok(stored) => {
                    debug!(doc_id = %stored.id, "Recorded recipe history");
                    events.publish(PersistenceEvent::HistoryRecorded { doc_id: stored.id });
                }
                Err(e) => {
                    error!("Failed to save recipe history: {}", e);
                    if let StorageError::PermissionDenied { path, reason } = &e {
                        events.publish(PersistenceEvent::PermissionDenied {
                            user_id: None,
                            path: path.clone(),
                            reason: reason.clone(),
                        });
                    }
                    events.publish(PersistenceEvent::HistoryFailed {
                        error: e.to_string(),
                    });
                }
            }
        })
    }

    /// Append a favorite under `identity`
    ///
    /// The caller is responsible for the save policy; this only reports what
    /// the store decided. Duplicates are accepted.
    pub async fn save_favorite(
        &self,
        identity: &Identity,
        request: &SaveRecipeRequest,
    ) -> Result<StoredDocument, PersistenceError> {
        let path = CollectionPath::favorites(identity.id());
        let document = NewDocument::from_serializable(&FavoriteRecord::from(request))
            .map_err(|e| PersistenceError::InvalidDocument(e.to_string()))?
            .with_server_timestamp(FAVORITE_TIMESTAMP_FIELD);

        match self.store.append(&path, document, Some(identity)).await {
            Ok(stored) => {
                info!(user_id = identity.id(), doc_id = %stored.id, "Saved favorite recipe");
                self.events.publish(PersistenceEvent::FavoriteSaved {
                    user_id: identity.id().to_string(),
                    doc_id: stored.id.clone(),
                });
                Ok(stored)
            }
            Err(e) => {
                let err = PersistenceError::from(e);
                self.report_failure(identity, &err);
                Err(err)
            }
        }
    }

    /// Favorites of `identity`, newest first
    pub async fn list_favorites(
        &self,
        identity: &Identity,
    ) -> Result<Vec<FavoriteRecipe>, PersistenceError> {
        let path = CollectionPath::favorites(identity.id());
        let mut documents = match self.store.list(&path, Some(identity)).await {
            Ok(documents) => documents,
            Err(e) => {
                let err = PersistenceError::from_read(e);
                if let PersistenceError::PermissionDenied { path, reason } = &err {
                    self.publish_permission_denied(identity, path, reason);
                }
                return Err(err);
            }
        };

        // Newest insert first among equal timestamps
        documents.reverse();

        let mut favorites = documents
            .iter()
            .map(decode_favorite)
            .collect::<Result<Vec<_>, _>>()?;
        favorites.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        debug!(user_id = identity.id(), count = favorites.len(), "Listed favorites");
        Ok(favorites)
    }

    fn report_failure(&self, identity: &Identity, err: &PersistenceError) {
        error!(user_id = identity.id(), "Failed to save recipe: {}", err);

        if let PersistenceError::PermissionDenied { path, reason } = err {
            self.publish_permission_denied(identity, path, reason);
        }

        self.events.publish(PersistenceEvent::FavoriteFailed {
            user_id: identity.id().to_string(),
            error: err.to_string(),
        });
    }

    fn publish_permission_denied(&self, identity: &Identity, path: &str, reason: &str) {
        self.events.publish(PersistenceEvent::PermissionDenied {
            user_id: Some(identity.id().to_string()),
            path: path.to_string(),
            reason: reason.to_string(),
        });
    }
}

fn decode_favorite(document: &StoredDocument) -> Result<FavoriteRecipe, PersistenceError> {
    let record: FavoriteRecord = document
        .decode()
        .map_err(|e| PersistenceError::InvalidDocument(format!("{}: {}", document.id, e)))?;

    Ok(FavoriteRecipe {
        id: document.id.clone(),
        recipe: record.recipe,
        ingredients: record.ingredients,
        created_at: record.created_at.unwrap_or(document.created_at),
    })
}
