//! Matchmaking port.
//!
//! The Like/Match discovery surface lives outside this engine. The session
//! context only needs one thing from it: when a game session ends, the
//! originating Match record must be released so the pair can be matched
//! afresh.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::DomainError;

/// Port to the external Match registry.
#[async_trait]
pub trait MatchRegistry: Send + Sync {
    /// Release the Match record that spawned a game session.
    async fn release_match(&self, match_id: Uuid) -> Result<(), DomainError>;
}
