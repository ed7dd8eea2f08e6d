//! Moonmatch — Game Session bounded context.
//!
//! One `GameSession` aggregate owns a complete two-player game: both player
//! slots with their word pools, the current turn and its sub-state machine,
//! the chat log, and the asked-question set. Commands validate state and turn
//! ownership before any mutation; every transition is recorded as a domain
//! event that also captures random draws, so reconstitution is deterministic.

pub mod application;
pub mod domain;
