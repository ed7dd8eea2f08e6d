//! Moonmatch HTTP API.
//!
//! Thin transport over the session command/query handlers: each route is one
//! player action, and every successful action publishes a room-scoped update
//! notification for the real-time layer to fan out.

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod broadcast;
pub mod error;
pub mod matchmaking;
pub mod routes;
pub mod state;

use state::AppState;

/// Builds the full application router.
// TODO: Replace CorsLayer::permissive() with restricted origins for production.
#[must_use]
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/sessions", routes::session::router())
        .nest("/api/v1/content", routes::content::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
