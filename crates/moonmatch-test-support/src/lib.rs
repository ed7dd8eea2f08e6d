//! Shared test mocks and utilities for the Moonmatch game engine.

mod clock;
mod matchmaking;
mod repository;
mod rng;

pub use clock::FixedClock;
pub use matchmaking::{NoopMatchRegistry, RecordingMatchRegistry};
pub use repository::{
    EmptyEventRepository, FailingEventRepository, InMemoryEventRepository,
    RecordingEventRepository,
};
pub use rng::{MockRng, SequenceRng};
