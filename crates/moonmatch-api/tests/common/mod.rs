//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tokio::sync::{Mutex, RwLock};
use tower::ServiceExt;

use moonmatch_api::build_router;
use moonmatch_api::state::AppState;
use moonmatch_content::Catalog;
use moonmatch_core::clock::Clock;
use moonmatch_core::rng::DeterministicRng;
use moonmatch_test_support::{
    FixedClock, InMemoryEventRepository, MockRng, RecordingMatchRegistry,
};

/// The app under test plus handles on its recording collaborators.
pub struct TestApp {
    pub router: Router,
    pub matches: Arc<RecordingMatchRegistry>,
}

/// Fixed timestamp used across all integration tests.
fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(
        chrono::TimeZone::with_ymd_and_hms(&chrono::Utc, 2026, 1, 15, 10, 0, 0).unwrap(),
    ))
}

/// Build the full app router with an in-memory event store and deterministic
/// Clock/RNG. Uses the same route structure as `main.rs`.
pub fn build_test_app() -> TestApp {
    let rng: Arc<Mutex<dyn DeterministicRng>> = Arc::new(Mutex::new(MockRng));
    let matches = Arc::new(RecordingMatchRegistry::new());
    let app_state = AppState::new(
        fixed_clock(),
        rng,
        Arc::new(InMemoryEventRepository::new()),
        Arc::new(RwLock::new(Catalog::new())),
        matches.clone(),
    );

    TestApp {
        router: build_router(app_state),
        matches,
    }
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: &Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    send(app, request).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or(serde_json::Value::Null)
    };

    (status, json)
}
