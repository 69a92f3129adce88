//! Request orchestration
//!
//! One call per user submission: validate, generate, shape the response and
//! hand the history write off to a background task. Failures come back as
//! user-facing messages inside the response envelopes; provider and storage
//! detail stays in the logs.

pub mod policy;
pub mod response;


pub use policy::SavePolicy;
pub use response::{FavoritesResponse, GenerateRecipeResponse, SaveRecipeResponse};

use std::fmt;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::flow::RecipeFlow;
use crate::identity::Identity;
use crate::messages;
use crate::persistence::PersistenceGateway;
use crate::recipe::{validate_ingredients, SaveRecipeRequest};

/// Per-request lifecycle of a generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Validating,
    Generating,
    Succeeded,
    Failed,
}

impl fmt::Display for RequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validating => "validating",
            Self::Generating => "generating",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

fn enter(state: RequestState) {
    debug!(state = %state, "Request state");
}

#[derive(Clone)]
pub struct RequestOrchestrator {
    flow: RecipeFlow,
    persistence: PersistenceGateway,
    policy: SavePolicy,
}

impl RequestOrchestrator {
    pub fn new(flow: RecipeFlow, persistence: PersistenceGateway, policy: SavePolicy) -> Self {
        Self {
            flow,
            persistence,
            policy,
        }
    }

    pub fn policy(&self) -> SavePolicy {
        self.policy
    }

    /// Generate a recipe from raw ingredient text
    ///
    /// `None` means the form carried no ingredients field at all. On success
    /// a history record is dispatched in the background; the response does
    /// not wait for it and its outcome never changes the response.
    pub async fn generate(&self, ingredients: Option<&str>) -> GenerateRecipeResponse {
        let span = info_span!("generate_recipe", request_id = %Uuid::new_v4());
        self.generate_inner(ingredients).instrument(span).await
    }

    async fn generate_inner(&self, ingredients: Option<&str>) -> GenerateRecipeResponse {
        enter(RequestState::Validating);
        let input = match validate_ingredients(ingredients) {
            Ok(input) => input,
            Err(e) => {
                enter(RequestState::Failed);
                debug!("Rejected ingredients: {}", e);
                return GenerateRecipeResponse::failure(e.user_message());
            }
        };

        enter(RequestState::Generating);
        let recipe = match self.flow.invoke(&input).await {
            Ok(recipe) => recipe,
            Err(e) => {
                enter(RequestState::Failed);
                error!(ingredients_len = input.as_str().len(), "Recipe generation failed: {}", e);
                return GenerateRecipeResponse::failure(messages::GENERATION_FAILED);
            }
        };

        enter(RequestState::Succeeded);
        info!(title = %recipe.title, steps = recipe.steps.len(), "Generated recipe");

        // Detached: the handle is dropped and the write finishes on its own
        drop(self.persistence.record_history(input.as_str(), &recipe));

        GenerateRecipeResponse::success(recipe)
    }

    /// Save a generated recipe as a favorite of `identity`
    pub async fn save_favorite(
        &self,
        request: &SaveRecipeRequest,
        identity: Option<&Identity>,
    ) -> SaveRecipeResponse {
        let identity = match identity {
            Some(identity) if self.policy.permits(Some(identity)) => identity,
            other => {
                debug!(
                    anonymous = ?other.map(Identity::is_anonymous),
                    policy = %self.policy,
                    "Save rejected without store write"
                );
                return SaveRecipeResponse::rejected(messages::LOGIN_REQUIRED_TO_SAVE);
            }
        };

        if !request.recipe.is_complete() {
            warn!(user_id = identity.id(), "Save rejected: incomplete recipe");
            return SaveRecipeResponse::rejected(messages::SAVE_FAILED);
        }

        match self.persistence.save_favorite(identity, request).await {
            Ok(_) => SaveRecipeResponse::saved(),
            Err(e) if e.is_permission_denied() => {
                SaveRecipeResponse::rejected(messages::SAVE_NOT_PERMITTED)
            }
            Err(_) => SaveRecipeResponse::rejected(messages::SAVE_FAILED),
        }
    }

    /// Favorites of `identity`, newest first
    ///
    /// Only authenticated identities may view favorites, whatever the save
    /// policy; anonymous viewers are turned away before the store is read.
    pub async fn list_favorites(&self, identity: Option<&Identity>) -> FavoritesResponse {
        let identity = match identity {
            Some(identity) if !identity.is_anonymous() => identity,
            _ => return FavoritesResponse::failure(messages::LOGIN_REQUIRED_TO_VIEW),
        };

        match self.persistence.list_favorites(identity).await {
            Ok(favorites) => FavoritesResponse::success(favorites),
            Err(e) => {
                warn!(user_id = identity.id(), "Failed to load favorites: {}", e);
                FavoritesResponse::failure(messages::FAVORITES_LOAD_FAILED)
            }
        }
    }
}
