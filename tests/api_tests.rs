use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};

use flixrec_api::{
    models::{CatalogDocument, Interaction},
    routes::{create_router, AppState},
    services::{catalog::InMemoryCatalogStore, RecommendationEngine},
};

fn catalog() -> CatalogDocument {
    serde_json::from_value(json!({
        "content": [
            {"id": "A", "title": "Heat", "genres": ["action"], "year": 2020, "popularity": 0.8},
            {"id": "B", "title": "Ronin", "genres": ["action"], "year": 2021, "popularity": 0.6},
            {"id": "C", "title": "Amelie", "genres": ["comedy", "romance"], "year": 2001,
             "popularity": 0.9, "rating": 8.3}
        ],
        "profiles": [
            {"id": "p1", "name": "Action Fan", "preferences": {"genres": ["action"]}},
            {"id": "p2", "name": "Comedy Lover", "preferences": {"genres": ["comedy"]}}
        ],
        "interactions": [
            {"profileId": "p1", "contentId": "A", "type": "view"}
        ]
    }))
    .unwrap()
}

fn create_test_server() -> (Arc<InMemoryCatalogStore>, TestServer) {
    let store = Arc::new(InMemoryCatalogStore::new(catalog()));
    let engine = Arc::new(RecommendationEngine::new(store.clone()));
    let state = AppState::new(engine, 10, 25);
    let server = TestServer::new(create_router(Arc::new(state))).unwrap();
    (store, server)
}

#[tokio::test]
async fn test_health_check() {
    let (_, server) = create_test_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    response.assert_json(&json!({ "status": "healthy" }));
}

#[tokio::test]
async fn test_recommendations_exclude_watched_items() {
    let (_, server) = create_test_server();

    let response = server.get("/api/v1/profiles/p1/recommendations").await;

    response.assert_status_ok();
    let ranked: Vec<Value> = response.json();
    let ids: Vec<&str> = ranked.iter().map(|r| r["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["B", "C"]);
    assert_eq!(ranked[0]["title"], "Ronin");
    assert!(ranked[0]["score"].as_f64().unwrap() > ranked[1]["score"].as_f64().unwrap());
}

#[tokio::test]
async fn test_recommendations_respect_count() {
    let (_, server) = create_test_server();

    let response = server
        .get("/api/v1/profiles/p1/recommendations")
        .add_query_param("count", 1)
        .await;

    response.assert_status_ok();
    let ranked: Vec<Value> = response.json();
    assert_eq!(ranked.len(), 1);
}

#[tokio::test]
async fn test_out_of_range_count_is_rejected() {
    let (_, server) = create_test_server();

    let response = server
        .get("/api/v1/content/trending")
        .add_query_param("count", 0)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = server
        .get("/api/v1/content/trending")
        .add_query_param("count", 26)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("25"));
}

#[tokio::test]
async fn test_unknown_profile_is_not_found() {
    let (_, server) = create_test_server();

    let response = server.get("/api/v1/profiles/ghost/recommendations").await;

    response.assert_status(StatusCode::NOT_FOUND);
    response.assert_json(&json!({ "error": "Profile not found: ghost" }));
}

#[tokio::test]
async fn test_unknown_content_is_not_found() {
    let (_, server) = create_test_server();

    let response = server.get("/api/v1/content/ghost/similar").await;
    response.assert_status(StatusCode::NOT_FOUND);

    let response = server.get("/api/v1/content/ghost/features").await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_similar_content_ranks_genre_match_first() {
    let (_, server) = create_test_server();

    let response = server.get("/api/v1/content/A/similar").await;

    response.assert_status_ok();
    let ranked: Vec<Value> = response.json();
    let ids: Vec<&str> = ranked.iter().map(|r| r["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["B", "C"]);
}

#[tokio::test]
async fn test_trending_and_genre_listing() {
    let (_, server) = create_test_server();

    let response = server
        .get("/api/v1/content/trending")
        .add_query_param("count", 2)
        .await;
    response.assert_status_ok();
    let ranked: Vec<Value> = response.json();
    assert_eq!(ranked[0]["id"], "C");
    assert_eq!(ranked[1]["id"], "A");

    let response = server.get("/api/v1/genres/Action/content").await;
    response.assert_status_ok();
    let ranked: Vec<Value> = response.json();
    let ids: Vec<&str> = ranked.iter().map(|r| r["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["A", "B"]);

    let response = server.get("/api/v1/genres/western/content").await;
    response.assert_status_ok();
    response.assert_json(&json!([]));
}

#[tokio::test]
async fn test_content_features() {
    let (_, server) = create_test_server();

    let response = server.get("/api/v1/content/C/features").await;

    response.assert_status_ok();
    let features: Value = response.json();
    assert_eq!(features["genres"]["comedy"], 1);
    assert_eq!(features["genres"]["action"], 0);
    // 0 for movies, 1 for series
    assert_eq!(features["type"], 0.0);

    let scalar = |name: &str| features[name].as_f64().unwrap();
    assert!((scalar("year") - 51.0 / 75.0).abs() < 1e-9);
    assert!((scalar("rating") - 0.83).abs() < 1e-9);
    assert!((scalar("popularity") - 0.9).abs() < 1e-9);
}

#[tokio::test]
async fn test_history_and_similar_profiles() {
    let (_, server) = create_test_server();

    let response = server.get("/api/v1/profiles/p1/history").await;
    response.assert_status_ok();
    response.assert_json(&json!({ "profileId": "p1", "contentIds": ["A"] }));

    // p2 has no interactions, so nobody is similar to p1
    let response = server.get("/api/v1/profiles/p1/similar").await;
    response.assert_status_ok();
    response.assert_json(&json!([]));
}

#[tokio::test]
async fn test_refresh_picks_up_new_interactions() {
    let (store, server) = create_test_server();

    let response = server.get("/api/v1/engine").await;
    response.assert_status_ok();
    let status: Value = response.json();
    assert_eq!(status["state"], "uninitialized");

    server.get("/api/v1/profiles/p2/history").await.assert_status_ok();
    let before: Value = server.get("/api/v1/engine").await.json();
    assert_eq!(before["state"], "ready");

    store
        .append_interaction(Interaction::new("p2", "A", "like"))
        .await;
    store
        .append_interaction(Interaction::new("p2", "C", "complete"))
        .await;

    // still served from the old snapshot
    server
        .get("/api/v1/profiles/p2/history")
        .await
        .assert_json(&json!({ "profileId": "p2", "contentIds": [] }));

    let response = server.post("/api/v1/engine/refresh").await;
    response.assert_status_ok();
    let after: Value = response.json();
    assert_ne!(after["snapshotId"], before["snapshotId"]);
    assert_eq!(after["stats"]["interactionCount"], 3);

    server
        .get("/api/v1/profiles/p2/history")
        .await
        .assert_json(&json!({ "profileId": "p2", "contentIds": ["A", "C"] }));

    let response = server.get("/api/v1/profiles/p1/similar").await;
    let similar: Vec<Value> = response.json();
    assert_eq!(similar[0]["profileId"], "p2");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let (_, server) = create_test_server();

    let response = server
        .get("/health")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("trace-1234"),
        )
        .await;
    assert_eq!(response.headers()["x-request-id"], "trace-1234");

    let response = server.get("/health").await;
    let generated = response.headers()["x-request-id"].to_str().unwrap();
    assert!(uuid::Uuid::parse_str(generated).is_ok());
}
