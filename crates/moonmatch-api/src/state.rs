//! Shared application state.

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use moonmatch_content::Catalog;
use moonmatch_core::clock::Clock;
use moonmatch_core::matchmaking::MatchRegistry;
use moonmatch_core::repository::EventRepository;
use moonmatch_core::rng::DeterministicRng;

use crate::broadcast::UpdateBroadcaster;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Clock used to stamp domain events.
    pub clock: Arc<dyn Clock>,
    /// RNG behind every word/question draw.
    pub rng: Arc<Mutex<dyn DeterministicRng>>,
    /// The event store holding all session streams.
    pub events: Arc<dyn EventRepository>,
    /// The game-content catalog.
    pub catalog: Arc<RwLock<Catalog>>,
    /// Port to the external Match registry.
    pub matches: Arc<dyn MatchRegistry>,
    /// Per-session update broadcast.
    pub updates: UpdateBroadcaster,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        rng: Arc<Mutex<dyn DeterministicRng>>,
        events: Arc<dyn EventRepository>,
        catalog: Arc<RwLock<Catalog>>,
        matches: Arc<dyn MatchRegistry>,
    ) -> Self {
        Self {
            clock,
            rng,
            events,
            catalog,
            matches,
            updates: UpdateBroadcaster::new(),
        }
    }
}
