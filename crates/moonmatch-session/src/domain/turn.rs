//! The turn and its sub-state machine.

use serde::{Deserialize, Serialize};

/// One of the session's two player slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerRole {
    /// The first player (active on the opening turn).
    A,
    /// The second player.
    B,
}

impl PlayerRole {
    /// The opposite slot.
    #[must_use]
    pub fn other(self) -> Self {
        match self {
            PlayerRole::A => PlayerRole::B,
            PlayerRole::B => PlayerRole::A,
        }
    }

    /// Index into the session's player array.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            PlayerRole::A => 0,
            PlayerRole::B => 1,
        }
    }
}

/// Sub-states of one turn cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnState {
    SelectQuestion,
    AnswerQuestion,
    ReactEmoji,
    NarrativeChoices,
    MoonPhase,
}

/// The four narrative moon-phase checkpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MoonPhase {
    New,
    FirstQuarter,
    Full,
    LastQuarter,
}

impl MoonPhase {
    /// Fixed phase label, as shown to players.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            MoonPhase::New => "new",
            MoonPhase::FirstQuarter => "first-quarter",
            MoonPhase::Full => "full",
            MoonPhase::LastQuarter => "last-quarter",
        }
    }

    /// The moon phase scheduled for a turn number, if any.
    #[must_use]
    pub fn for_turn(turn_number: u32) -> Option<Self> {
        match turn_number {
            3 => Some(MoonPhase::New),
            7 => Some(MoonPhase::FirstQuarter),
            11 => Some(MoonPhase::Full),
            15 => Some(MoonPhase::LastQuarter),
            _ => None,
        }
    }
}

/// A session ends when the turn counter reaches this value.
pub const MAX_TURNS: u32 = 30;

/// A pair of per-player completion flags, reset together.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairFlags {
    a: bool,
    b: bool,
}

impl PairFlags {
    /// Whether the flag for a role is set.
    #[must_use]
    pub fn is_set(self, role: PlayerRole) -> bool {
        match role {
            PlayerRole::A => self.a,
            PlayerRole::B => self.b,
        }
    }

    /// Sets the flag for a role.
    pub fn set(&mut self, role: PlayerRole) {
        match role {
            PlayerRole::A => self.a = true,
            PlayerRole::B => self.b = true,
        }
    }

    /// Clears both flags.
    pub fn clear(&mut self) {
        self.a = false;
        self.b = false;
    }

    /// Whether both flags are set.
    #[must_use]
    pub fn both(self) -> bool {
        self.a && self.b
    }
}

/// The current turn of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    /// Turn counter, starting at 1.
    pub number: u32,
    /// Narrative nights completed.
    pub night: u32,
    /// Current sub-state.
    pub state: TurnState,
    /// The player whose action is expected next.
    pub active: PlayerRole,
    /// Per-player question/answer/reaction cycle completion.
    pub cycle_done: PairFlags,
    /// Per-player narrative choice completion for this night.
    pub narrative_done: PairFlags,
    /// Per-player moon-phase message completion.
    pub moon_written: PairFlags,
}

impl Turn {
    /// The opening turn: number 1, player A to select a question.
    #[must_use]
    pub fn first() -> Self {
        Self {
            number: 1,
            night: 0,
            state: TurnState::SelectQuestion,
            active: PlayerRole::A,
            cycle_done: PairFlags::default(),
            narrative_done: PairFlags::default(),
            moon_written: PairFlags::default(),
        }
    }

    /// Hands the turn to the other player.
    pub fn switch_active(&mut self) {
        self.active = self.active.other();
    }
}
