//! The content-pack ingestion document.
//!
//! A pack is authored as one JSON document: qualities with their word lists,
//! activities with their questions, interests with their night-numbered
//! narrative choices, the simple-word pool, and optionally one playable
//! character whose slots reference the other sections by name.

use serde::{Deserialize, Serialize};

use crate::words::{Word, WordKind};

/// Top-level ingestion document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentPack {
    /// Qualities and the thematic words they grant.
    #[serde(default)]
    pub qualities: Vec<QualityDoc>,
    /// Activities and the questions they unlock.
    #[serde(default)]
    pub activities: Vec<ActivityDoc>,
    /// Interests and their narrative choices.
    #[serde(default)]
    pub interests: Vec<InterestDoc>,
    /// Simple grammatical words, replenished into player pools.
    #[serde(default)]
    pub simple_words: Vec<SimpleWordDoc>,
    /// The playable character described by this pack, if any.
    #[serde(default)]
    pub character: Option<CharacterDoc>,
}

/// One quality and its word grants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityDoc {
    /// Quality name (identity).
    pub name: String,
    /// Thematic words granted when the quality is chosen.
    #[serde(default)]
    pub words: Vec<String>,
}

/// One activity and its questions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityDoc {
    /// Activity name (identity).
    pub name: String,
    /// Question texts unlocked by the activity.
    #[serde(default)]
    pub questions: Vec<String>,
}

/// One interest and its narrative choices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterestDoc {
    /// Interest name (identity).
    pub name: String,
    /// Narrative choices tied to this interest.
    #[serde(default)]
    pub narrative_choices: Vec<NarrativeChoiceDoc>,
}

/// One narrative choice within an interest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrativeChoiceDoc {
    /// Choice name (identity within the interest and night).
    pub name: String,
    /// Narrative night the choice belongs to.
    pub night_number: u32,
    /// Thematic words granted when the choice is taken.
    #[serde(default)]
    pub words: Vec<String>,
}

/// One simple grammatical word.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimpleWordDoc {
    /// The word text.
    pub text: String,
    /// Grammatical kind.
    pub kind: WordKind,
}

impl SimpleWordDoc {
    /// Converts the document entry into a catalog word.
    #[must_use]
    pub fn to_word(&self) -> Word {
        Word::new(self.text.clone(), self.kind)
    }
}

/// The playable character and its creation slots, all referenced by name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CharacterDoc {
    /// Character name (identity, also the player display name).
    pub name: String,
    /// Avatar image location.
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub quality_1_choices: Vec<String>,
    #[serde(default)]
    pub quality_2_choices: Vec<String>,
    #[serde(default)]
    pub quality_3_choices: Vec<String>,
    #[serde(default)]
    pub interest_1_choices: Vec<String>,
    #[serde(default)]
    pub interest_2_choices: Vec<String>,
    #[serde(default)]
    pub interest_3_choices: Vec<String>,
    #[serde(default)]
    pub activity_1_choices: Vec<String>,
    #[serde(default)]
    pub activity_2_choices: Vec<String>,
}
