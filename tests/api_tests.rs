//! HTTP surface tests driven through the router

mod common;

use axum::body::Body;
use axum::http::{
    header::{AUTHORIZATION, CONTENT_TYPE},
    Request, StatusCode,
};
use common::{json_body, TestContextBuilder};
use serde_json::json;
use souschef::identity::Identity;
use souschef::orchestrator::SavePolicy;
use souschef::server::build_router;
use souschef::storage::{CollectionPath, DocumentStore, MemoryStore};
use souschef::testing::{sample_recipe, FailingStore, ScriptedModel};
use std::sync::Arc;
use tower::ServiceExt;

fn form_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .expect("build request")
}

fn json_request(uri: &str, token: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("build request")
}

fn favorites_request(token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri("/api/favorites");
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).expect("build request")
}

fn save_body(ingredients: &str) -> serde_json::Value {
    let mut recipe = serde_json::to_value(sample_recipe()).unwrap();
    recipe["ingredients"] = json!(ingredients);
    json!({ "recipe": recipe })
}

#[tokio::test]
async fn test_generate_endpoint_returns_recipe() {
    let (context, _) = TestContextBuilder::new().build();
    let app = build_router(context);

    let response = app
        .oneshot(form_request(
            "/api/recipes/generate",
            "ingredients=chicken%2C+rice%2C+broccoli",
        ))
        .await
        .expect("router call");
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert!(json["error"].is_null());
    assert_eq!(json["data"]["title"], sample_recipe().title);
    assert!(json["data"]["preparationTime"].is_string());
    assert!(!json["data"]["steps"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_generate_endpoint_reports_validation_error() {
    let (context, model) = TestContextBuilder::new().build();
    let app = build_router(context);

    let response = app
        .oneshot(form_request("/api/recipes/generate", "ingredients=ab"))
        .await
        .expect("router call");
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json, json!({ "data": null, "error": "Voer minimaal 3 tekens in." }));
    assert_eq!(model.call_count(), 0);
}

#[tokio::test]
async fn test_generate_endpoint_without_field() {
    let (context, _) = TestContextBuilder::new().build();
    let app = build_router(context);

    let response = app
        .oneshot(form_request("/api/recipes/generate", ""))
        .await
        .expect("router call");

    let json = json_body(response).await;
    assert_eq!(json["error"], "Validatie mislukt.");
}

#[tokio::test]
async fn test_generate_endpoint_hides_provider_errors() {
    let (context, _) = TestContextBuilder::new()
        .with_model(ScriptedModel::new().with_empty_output())
        .build();
    let app = build_router(context);

    let response = app
        .oneshot(form_request("/api/recipes/generate", "ingredients=soep"))
        .await
        .expect("router call");

    let json = json_body(response).await;
    assert!(json["data"].is_null());
    assert_eq!(
        json["error"],
        "Er is iets misgegaan bij het genereren van het recept. Probeer het later opnieuw."
    );
}

#[tokio::test]
async fn test_save_and_list_favorites_for_session() {
    let (context, _) = TestContextBuilder::new()
        .with_session("tok-u1", "u1")
        .build();
    let app = build_router(context);

    let response = app
        .clone()
        .oneshot(json_request("/api/favorites", Some("tok-u1"), save_body("kip, rijst")))
        .await
        .expect("router call");
    assert_eq!(json_body(response).await, json!({ "success": true, "error": null }));

    let response = app
        .oneshot(favorites_request(Some("tok-u1")))
        .await
        .expect("router call");
    let json = json_body(response).await;
    let favorites = json["data"].as_array().expect("favorites");
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0]["title"], sample_recipe().title);
    assert_eq!(favorites[0]["steps"].as_array().unwrap().len(), sample_recipe().steps.len());
    assert_eq!(favorites[0]["ingredients"], "kip, rijst");
    assert!(favorites[0]["createdAt"].is_string());
}

#[tokio::test]
async fn test_save_requires_signed_in_session() {
    let (context, _) = TestContextBuilder::new().build();
    let app = build_router(context);

    // Anonymous session issued by the server
    let response = app
        .clone()
        .oneshot(json_request("/api/identity", None, json!({})))
        .await
        .expect("router call");
    let anonymous_token = json_body(response).await["token"]
        .as_str()
        .expect("token")
        .to_string();

    for token in [None, Some("unknown-token"), Some(anonymous_token.as_str())] {
        let response = app
            .clone()
            .oneshot(json_request("/api/favorites", token, save_body("kip")))
            .await
            .expect("router call");
        assert_eq!(
            json_body(response).await,
            json!({
                "success": false,
                "error": "Je moet ingelogd zijn om een recept op te slaan."
            })
        );
    }
}

#[tokio::test]
async fn test_client_supplied_identity_is_refused() {
    let store = Arc::new(MemoryStore::new(SavePolicy::AuthenticatedOnly.access_rules()));
    let (context, _) = TestContextBuilder::new().with_store(store.clone()).build();
    let app = build_router(context);

    let mut body = save_body("kip");
    body["identity"] = json!({ "id": "victim", "isAnonymous": false });
    let response = app
        .oneshot(json_request("/api/favorites", None, body))
        .await
        .expect("router call");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(store.len(&CollectionPath::favorites("victim")).await, 0);
}

#[tokio::test]
async fn test_favorites_are_scoped_to_the_session() {
    let (context, _) = TestContextBuilder::new()
        .with_session("tok-victim", "victim")
        .with_session("tok-other", "other")
        .build();
    let store = context.store().clone();
    let app = build_router(context);

    let response = app
        .clone()
        .oneshot(json_request("/api/favorites", Some("tok-victim"), save_body("geheim")))
        .await
        .expect("router call");
    assert_eq!(json_body(response).await["success"], true);

    // No session: turned away without reading anything
    let response = app
        .clone()
        .oneshot(favorites_request(None))
        .await
        .expect("router call");
    assert_eq!(
        json_body(response).await,
        json!({ "data": null, "error": "Log in om je favoriete recepten te bekijken." })
    );

    // Another user's session sees only its own, empty, collection
    let response = app
        .oneshot(favorites_request(Some("tok-other")))
        .await
        .expect("router call");
    assert_eq!(json_body(response).await, json!({ "data": [], "error": null }));

    let victim = Identity::authenticated("victim");
    let stored = store
        .list(&CollectionPath::favorites("victim"), Some(&victim))
        .await
        .unwrap();
    assert_eq!(stored.len(), 1);
}

#[tokio::test]
async fn test_identity_endpoint_issues_or_keeps_session() {
    let (context, _) = TestContextBuilder::new()
        .with_session("tok-u1", "u1")
        .build();
    let app = build_router(context);

    let response = app
        .clone()
        .oneshot(json_request("/api/identity", None, json!({})))
        .await
        .expect("router call");
    let json = json_body(response).await;
    assert_eq!(json["identity"]["isAnonymous"], true);
    assert!(!json["identity"]["id"].as_str().unwrap().is_empty());
    let token = json["token"].as_str().expect("token").to_string();

    // Same token, same identity
    let response = app
        .clone()
        .oneshot(json_request("/api/identity", Some(&token), json!({})))
        .await
        .expect("router call");
    let again = json_body(response).await;
    assert_eq!(again["identity"], json["identity"]);
    assert_eq!(again["token"], token.as_str());

    let response = app
        .oneshot(json_request("/api/identity", Some("tok-u1"), json!({})))
        .await
        .expect("router call");
    let json = json_body(response).await;
    assert_eq!(json["identity"], json!({ "id": "u1", "isAnonymous": false }));
    assert_eq!(json["token"], "tok-u1");
}

#[tokio::test]
async fn test_health_reflects_store() {
    let (healthy, _) = TestContextBuilder::new().build();
    let response = build_router(healthy)
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (broken, _) = TestContextBuilder::new()
        .with_store(Arc::new(FailingStore::unavailable()))
        .build();
    let response = build_router(broken)
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
