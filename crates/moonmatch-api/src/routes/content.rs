//! Routes for the Content Catalog bounded context.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use uuid::Uuid;

use moonmatch_content::{ContentPack, IngestSummary};

use crate::error::ApiError;
use crate::state::AppState;

/// One entry of the character listing backing avatar selection.
#[derive(Debug, Serialize)]
pub struct CharacterSummary {
    /// Catalog identifier.
    pub id: Uuid,
    /// Character name.
    pub name: String,
    /// Avatar image location.
    pub avatar_url: String,
}

/// POST /ingest — bulk-load a content pack (idempotent, get-or-create).
async fn ingest_pack(
    State(state): State<AppState>,
    Json(pack): Json<ContentPack>,
) -> Result<(StatusCode, Json<IngestSummary>), ApiError> {
    let mut catalog = state.catalog.write().await;
    let summary = catalog.ingest(&pack)?;
    tracing::info!(version_hash = %summary.version_hash, "content pack ingested");
    Ok((StatusCode::CREATED, Json(summary)))
}

/// GET /characters — playable characters for avatar selection.
async fn list_characters(State(state): State<AppState>) -> Json<Vec<CharacterSummary>> {
    let catalog = state.catalog.read().await;
    let mut characters: Vec<CharacterSummary> = catalog
        .characters()
        .map(|c| CharacterSummary {
            id: c.id,
            name: c.name.clone(),
            avatar_url: c.avatar_url.clone(),
        })
        .collect();
    characters.sort_by(|a, b| a.name.cmp(&b.name));
    Json(characters)
}

/// A named catalog entry, for the profile-creation slot menus.
#[derive(Debug, Serialize)]
pub struct NamedEntry {
    /// Catalog identifier.
    pub id: Uuid,
    /// Entry name.
    pub name: String,
}

fn sorted_entries<'a>(entries: impl Iterator<Item = (Uuid, &'a str)>) -> Vec<NamedEntry> {
    let mut entries: Vec<NamedEntry> = entries
        .map(|(id, name)| NamedEntry {
            id,
            name: name.to_owned(),
        })
        .collect();
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    entries
}

/// GET /qualities
async fn list_qualities(State(state): State<AppState>) -> Json<Vec<NamedEntry>> {
    let catalog = state.catalog.read().await;
    Json(sorted_entries(
        catalog.qualities().map(|q| (q.id, q.name.as_str())),
    ))
}

/// GET /interests
async fn list_interests(State(state): State<AppState>) -> Json<Vec<NamedEntry>> {
    let catalog = state.catalog.read().await;
    Json(sorted_entries(
        catalog.interests().map(|i| (i.id, i.name.as_str())),
    ))
}

/// GET /activities
async fn list_activities(State(state): State<AppState>) -> Json<Vec<NamedEntry>> {
    let catalog = state.catalog.read().await;
    Json(sorted_entries(
        catalog.activities().map(|a| (a.id, a.name.as_str())),
    ))
}

/// Returns the router for the content context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ingest", post(ingest_pack))
        .route("/characters", get(list_characters))
        .route("/qualities", get(list_qualities))
        .route("/interests", get(list_interests))
        .route("/activities", get(list_activities))
}
