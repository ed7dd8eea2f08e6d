//! Moonmatch API server entry point.

use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tokio::sync::{Mutex, RwLock};
use tracing_subscriber::EnvFilter;

use moonmatch_api::matchmaking::LoggedMatchRegistry;
use moonmatch_api::state::AppState;
use moonmatch_content::{Catalog, ContentPack};
use moonmatch_core::clock::SystemClock;
use moonmatch_core::rng::{DeterministicRng, SystemRng};
use moonmatch_event_store::PgEventRepository;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Moonmatch API server");

    // Read configuration from environment.
    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| "DATABASE_URL environment variable must be set")?;
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse()
        .map_err(|e| format!("PORT must be a valid u16: {e}"))?;

    // Create database connection pool and apply migrations.
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await?;
    sqlx::migrate!("../../migrations").run(&pool).await?;

    // Load the content catalog, optionally seeded from a pack file.
    let mut catalog = Catalog::new();
    if let Ok(path) = std::env::var("CONTENT_PACK_PATH") {
        let raw = std::fs::read_to_string(&path)
            .map_err(|e| format!("could not read content pack {path}: {e}"))?;
        let pack: ContentPack = serde_json::from_str(&raw)
            .map_err(|e| format!("could not parse content pack {path}: {e}"))?;
        let summary = catalog.ingest(&pack)?;
        tracing::info!(version_hash = %summary.version_hash, "content pack ingested at startup");
    }

    // Build application state.
    let rng: Arc<Mutex<dyn DeterministicRng>> = Arc::new(Mutex::new(SystemRng));
    let app_state = AppState::new(
        Arc::new(SystemClock),
        rng,
        Arc::new(PgEventRepository::new(pool)),
        Arc::new(RwLock::new(catalog)),
        Arc::new(LoggedMatchRegistry),
    );

    let app = moonmatch_api::build_router(app_state);

    // Start server.
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .map_err(|e| format!("invalid HOST:PORT combination: {e}"))?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
