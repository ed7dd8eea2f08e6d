//! Test match registries — mock `MatchRegistry` implementations.

use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use moonmatch_core::error::DomainError;
use moonmatch_core::matchmaking::MatchRegistry;

/// A match registry that records every released match id.
#[derive(Debug, Default)]
pub struct RecordingMatchRegistry {
    released: Mutex<Vec<Uuid>>,
}

impl RecordingMatchRegistry {
    /// Creates an empty recording registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all released match ids.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn released(&self) -> Vec<Uuid> {
        self.released.lock().unwrap().clone()
    }
}

#[async_trait]
impl MatchRegistry for RecordingMatchRegistry {
    async fn release_match(&self, match_id: Uuid) -> Result<(), DomainError> {
        self.released.lock().unwrap().push(match_id);
        Ok(())
    }
}

/// A match registry that silently accepts every release.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMatchRegistry;

#[async_trait]
impl MatchRegistry for NoopMatchRegistry {
    async fn release_match(&self, _match_id: Uuid) -> Result<(), DomainError> {
        Ok(())
    }
}
