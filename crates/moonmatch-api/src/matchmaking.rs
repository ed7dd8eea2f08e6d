//! Production `MatchRegistry` adapter.
//!
//! The Like/Match discovery surface is a separate service. Until its release
//! endpoint is wired in, ended sessions log the release so the record can be
//! reconciled out-of-band.

use async_trait::async_trait;
use uuid::Uuid;

use moonmatch_core::error::DomainError;
use moonmatch_core::matchmaking::MatchRegistry;

/// Logs match releases for out-of-band reconciliation.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggedMatchRegistry;

#[async_trait]
impl MatchRegistry for LoggedMatchRegistry {
    async fn release_match(&self, match_id: Uuid) -> Result<(), DomainError> {
        tracing::info!(%match_id, "releasing match record");
        Ok(())
    }
}
