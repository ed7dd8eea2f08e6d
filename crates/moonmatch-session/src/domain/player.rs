//! Per-session player state.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use moonmatch_content::Word;

use super::turn::MoonPhase;

/// Character-creation progress for one player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreationState {
    AvatarSelection,
    MoonMeaningSelection,
    PublicProfileCreation,
    Complete,
}

/// The catalog character a player chose during avatar selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterRef {
    /// Catalog identifier of the character.
    pub id: Uuid,
    /// Character name, used as the player display name.
    pub name: String,
    /// Avatar image location.
    pub avatar_url: String,
}

/// One phase entry of a moon-sign interpretation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseMeaning {
    /// The interpretation text.
    pub meaning: String,
    /// Why the player reads the phase this way.
    pub reason: String,
}

/// A player's interpretation of the four fixed moon phases.
///
/// Access is keyed by the [`MoonPhase`] enum; unknown phase labels are
/// rejected when the enum is parsed, not at lookup time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoonSignInterpretation {
    /// Entry for the new moon.
    pub new_moon: PhaseMeaning,
    /// Entry for the first quarter.
    pub first_quarter: PhaseMeaning,
    /// Entry for the full moon.
    pub full_moon: PhaseMeaning,
    /// Entry for the last quarter.
    pub last_quarter: PhaseMeaning,
}

impl MoonSignInterpretation {
    /// The entry for a phase.
    #[must_use]
    pub fn meaning(&self, phase: MoonPhase) -> &PhaseMeaning {
        match phase {
            MoonPhase::New => &self.new_moon,
            MoonPhase::FirstQuarter => &self.first_quarter,
            MoonPhase::Full => &self.full_moon,
            MoonPhase::LastQuarter => &self.last_quarter,
        }
    }

    /// Overwrites the interpretation text for a phase.
    pub fn set_meaning(&mut self, phase: MoonPhase, text: &str) {
        let entry = match phase {
            MoonPhase::New => &mut self.new_moon,
            MoonPhase::FirstQuarter => &mut self.first_quarter,
            MoonPhase::Full => &mut self.full_moon,
            MoonPhase::LastQuarter => &mut self.last_quarter,
        };
        text.clone_into(&mut entry.meaning);
    }
}

/// One player slot of a game session.
///
/// A player exists only inside its session; releasing the session releases
/// the player and every pool it owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    /// The matched user occupying this slot.
    pub user_id: Uuid,
    /// Character-creation progress.
    pub creation_state: CreationState,
    /// Chosen character, set during avatar selection.
    pub character: Option<CharacterRef>,
    /// Moon-sign interpretation, set during moon-meaning selection.
    pub moon_sign: Option<MoonSignInterpretation>,
    /// Earned thematic vocabulary.
    pub character_words: BTreeSet<Word>,
    /// Replenished grammatical scaffolding.
    pub simple_words: BTreeSet<Word>,
    /// Questions available for selection.
    pub question_pool: BTreeSet<Uuid>,
    /// Narrative choices available to take.
    pub narrative_choice_pool: BTreeSet<Uuid>,
}

impl Player {
    /// Creates a fresh slot for a matched user.
    #[must_use]
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            creation_state: CreationState::AvatarSelection,
            character: None,
            moon_sign: None,
            character_words: BTreeSet::new(),
            simple_words: BTreeSet::new(),
            question_pool: BTreeSet::new(),
            narrative_choice_pool: BTreeSet::new(),
        }
    }

    /// Display name, available once a character is chosen.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.character.as_ref().map(|c| c.name.as_str())
    }

    /// Avatar of the chosen character, empty before avatar selection.
    #[must_use]
    pub fn avatar_url(&self) -> &str {
        self.character.as_ref().map_or("", |c| c.avatar_url.as_str())
    }
}
