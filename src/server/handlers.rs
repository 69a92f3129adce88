//! Request handlers

use axum::{
    extract::{Form, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::Json,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::context::AppContext;
use crate::identity::Identity;
use crate::orchestrator::{FavoritesResponse, GenerateRecipeResponse, SaveRecipeResponse};
use crate::recipe::SaveRecipeRequest;

/// Form body of a generation request
#[derive(Debug, Deserialize)]
pub struct GenerateForm {
    pub ingredients: Option<String>,
}

/// JSON body of a save request; the identity comes from the session
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SaveFavoriteBody {
    pub recipe: SaveRecipeRequest,
}

#[derive(Debug, Serialize)]
pub struct IdentityResponse {
    pub identity: Option<Identity>,
    pub token: Option<String>,
    pub error: Option<String>,
}

/// Token from an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Identity of the session the request carries, if any
async fn principal(context: &AppContext, headers: &HeaderMap) -> Option<Identity> {
    match bearer_token(headers) {
        Some(token) => context.sessions().lookup(token).await,
        None => None,
    }
}

pub async fn health_check(State(context): State<AppContext>) -> Result<&'static str, StatusCode> {
    context.store().health_check().await.map_err(|e| {
        warn!("Health check failed: {}", e);
        StatusCode::SERVICE_UNAVAILABLE
    })?;
    Ok("ok")
}

pub async fn generate_recipe(
    State(context): State<AppContext>,
    Form(form): Form<GenerateForm>,
) -> Json<GenerateRecipeResponse> {
    Json(
        context
            .orchestrator()
            .generate(form.ingredients.as_deref())
            .await,
    )
}

pub async fn save_favorite(
    State(context): State<AppContext>,
    headers: HeaderMap,
    Json(body): Json<SaveFavoriteBody>,
) -> Json<SaveRecipeResponse> {
    let identity = principal(&context, &headers).await;

    Json(
        context
            .orchestrator()
            .save_favorite(&body.recipe, identity.as_ref())
            .await,
    )
}

/// Favorites of the calling session
pub async fn list_favorites(
    State(context): State<AppContext>,
    headers: HeaderMap,
) -> Json<FavoritesResponse> {
    let identity = principal(&context, &headers).await;

    Json(context.orchestrator().list_favorites(identity.as_ref()).await)
}

/// Make sure the client leaves with at least an anonymous session
pub async fn resolve_identity(
    State(context): State<AppContext>,
    headers: HeaderMap,
) -> Json<IdentityResponse> {
    let response = match context.sessions().bootstrap(bearer_token(&headers)).await {
        Ok(session) => IdentityResponse {
            identity: Some(session.identity),
            token: Some(session.token),
            error: None,
        },
        Err(e) => {
            warn!("Identity bootstrap failed: {}", e);
            IdentityResponse {
                identity: None,
                token: None,
                error: Some(crate::messages::IDENTITY_UNAVAILABLE.to_string()),
            }
        }
    };

    Json(response)
}
