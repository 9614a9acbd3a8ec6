#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use quotebox_server::{app, AppState};
use quotebox_store::QuoteStore;
use tempfile::TempDir;
use tower::ServiceExt;

/// Router backed by a fresh file database. Keep the `TempDir` alive for the
/// duration of the test.
pub fn setup_app() -> (Router, QuoteStore, TempDir) {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("quotes.db");
    let store = QuoteStore::open(path.to_str(), Default::default()).expect("failed to open store");
    let router = app(AppState::with_store(store.clone()));
    (router, store, dir)
}

/// Seeds quotes with the given like counts, returning their ids.
pub fn seed_likes(store: &QuoteStore, likes: &[i64]) -> Vec<i64> {
    likes
        .iter()
        .enumerate()
        .map(|(i, &n)| {
            let created = store
                .create_quote(&format!("author-{i}"), &format!("quote-{i}"))
                .unwrap();
            for _ in 0..n {
                store.increment_likes(created.id).unwrap();
            }
            created.id
        })
        .collect()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn post_json(app: &Router, uri: &str, body: &str) -> Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
