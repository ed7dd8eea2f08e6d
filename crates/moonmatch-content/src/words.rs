//! Vocabulary tokens.
//!
//! Words are content-addressed: two words are the same entry exactly when
//! both text and grammatical kind match. Thematic words earned through
//! qualities and narrative choices are nouns; the remaining kinds form the
//! simple grammatical scaffolding that is continuously replenished.

use serde::{Deserialize, Serialize};

/// Grammatical kind of a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WordKind {
    /// Thematic character words.
    Noun,
    Verb,
    Pronoun,
    Preposition,
    Conjunction,
    Article,
    Determiner,
    Modifier,
}

impl WordKind {
    /// The simple grammatical kinds, in replenishment order.
    pub const SIMPLE: [WordKind; 7] = [
        WordKind::Verb,
        WordKind::Pronoun,
        WordKind::Preposition,
        WordKind::Conjunction,
        WordKind::Article,
        WordKind::Determiner,
        WordKind::Modifier,
    ];

    /// Target count of this kind in a player's simple word pool.
    #[must_use]
    pub fn simple_target(self) -> usize {
        match self {
            WordKind::Noun => 0,
            WordKind::Verb | WordKind::Preposition | WordKind::Conjunction => 5,
            WordKind::Pronoun | WordKind::Article => 3,
            WordKind::Determiner => 5,
            WordKind::Modifier => 4,
        }
    }
}

/// A vocabulary token, unique by `(text, kind)`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Word {
    /// The word text as typed by players.
    pub text: String,
    /// Grammatical kind.
    pub kind: WordKind,
}

impl Word {
    /// Creates a word of the given kind.
    #[must_use]
    pub fn new(text: impl Into<String>, kind: WordKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }

    /// Creates a thematic (noun) character word.
    #[must_use]
    pub fn thematic(text: impl Into<String>) -> Self {
        Self::new(text, WordKind::Noun)
    }
}
