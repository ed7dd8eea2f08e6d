//! Moonmatch — Content Catalog bounded context.
//!
//! Reference data the game state machines look up by identity: qualities and
//! their words, activities and their questions, interests and their narrative
//! choices, playable characters, and the pool of simple grammatical words.
//! Ingestion is bulk, document-shaped, and idempotent (get-or-create by name).

pub mod catalog;
pub mod pack;
pub mod words;

pub use catalog::{
    Activity, Catalog, Character, IngestSummary, Interest, NarrativeChoice, Quality, Question,
};
pub use pack::{CharacterDoc, ContentPack};
pub use words::{Word, WordKind};
