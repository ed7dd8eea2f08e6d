//! Moonmatch — PostgreSQL event store.
//!
//! One `domain_events` table holds every aggregate stream. Appends run inside
//! a transaction that locks the stream tail and checks the expected version,
//! so two racing player actions serialize here: the loser gets a concurrency
//! conflict instead of silently overwriting the turn state.

pub mod pg_event_repository;
pub mod schema;

pub use pg_event_repository::PgEventRepository;
