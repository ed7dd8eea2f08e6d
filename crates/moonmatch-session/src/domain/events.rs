//! Domain events for the Game Session context.
//!
//! Events are the only way session state changes. Payloads embed every
//! outcome that was decided at command time — including random word draws and
//! pool consumption — so that `apply` is a pure, deterministic fold.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use moonmatch_content::Word;
use moonmatch_core::event::{DomainEvent, EventMetadata};

use super::chat::ChatMessage;
use super::player::{CharacterRef, MoonSignInterpretation};
use super::turn::{MoonPhase, PlayerRole, TurnState};
use super::word_pools::ConsumedWord;

/// Emitted when a match spawns a session and both players are assigned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInitialized {
    /// The session (game) identifier.
    pub session_id: Uuid,
    /// The Match record that spawned this session.
    pub match_id: Uuid,
    /// User occupying slot A (active on the first turn).
    pub player_a: Uuid,
    /// User occupying slot B.
    pub player_b: Uuid,
}

/// Emitted when a player picks their character avatar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterChosen {
    /// The session identifier.
    pub session_id: Uuid,
    /// The choosing player's slot.
    pub role: PlayerRole,
    /// The chosen character.
    pub character: CharacterRef,
}

/// Emitted when a player records their moon-sign interpretation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoonMeaningChosen {
    /// The session identifier.
    pub session_id: Uuid,
    /// The choosing player's slot.
    pub role: PlayerRole,
    /// The four-phase interpretation document.
    pub interpretation: MoonSignInterpretation,
}

/// Emitted when a player completes their public profile. The drawn pool
/// grants are recorded verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileCreated {
    /// The session identifier.
    pub session_id: Uuid,
    /// The completing player's slot.
    pub role: PlayerRole,
    /// Display name, taken from the chosen character.
    pub display_name: String,
    /// Thematic words drawn from the chosen qualities.
    pub character_words: Vec<Word>,
    /// Questions drawn from the chosen activities.
    pub questions: Vec<Uuid>,
    /// Narrative choices granted by the chosen interests.
    pub narrative_choices: Vec<Uuid>,
    /// Simple words drawn by the initial replenishment.
    pub simple_words: Vec<Word>,
}

/// Emitted when both players finished character creation and regular play
/// begins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegularTurnStarted {
    /// The session identifier.
    pub session_id: Uuid,
}

/// Emitted when the active player selects a question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionSelected {
    /// The session identifier.
    pub session_id: Uuid,
    /// The asking player's slot.
    pub role: PlayerRole,
    /// The selected question.
    pub question_id: Uuid,
    /// The chat entry carrying the question text.
    pub message: ChatMessage,
}

/// Emitted when the active player answers the pending question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionAnswered {
    /// The session identifier.
    pub session_id: Uuid,
    /// The answering player's slot.
    pub role: PlayerRole,
    /// The chat entry carrying the raw answer.
    pub message: ChatMessage,
    /// Pool entries consumed by the answer's tokens.
    pub consumed: Vec<ConsumedWord>,
}

/// Emitted when the active player reacts to the latest message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmojiReacted {
    /// The session identifier.
    pub session_id: Uuid,
    /// The reacting player's slot.
    pub role: PlayerRole,
    /// The emoji attached to the most recent chat entry.
    pub emoji: String,
    /// Whether this reaction completed the cycle for both players.
    pub completed_cycle: bool,
}

/// Emitted when a player takes a narrative choice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrativeChoiceTaken {
    /// The session identifier.
    pub session_id: Uuid,
    /// The choosing player's slot.
    pub role: PlayerRole,
    /// The taken choice, consumed from the player's pool.
    pub choice_id: Uuid,
    /// Thematic words granted by the choice.
    pub granted: Vec<Word>,
    /// Simple words drawn by the follow-up replenishment.
    pub replenished: Vec<Word>,
}

/// Emitted when both players made their narrative choice and the night ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NightCompleted {
    /// The session identifier.
    pub session_id: Uuid,
    /// The incremented turn counter.
    pub turn_number: u32,
    /// The incremented narrative-night counter.
    pub night: u32,
    /// The phase the next turn opens in.
    pub next_state: TurnState,
}

/// Emitted when a player writes their moon-phase message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoonMessageWritten {
    /// The session identifier.
    pub session_id: Uuid,
    /// The writing player's slot.
    pub role: PlayerRole,
    /// The phase scheduled for the current turn.
    pub phase: MoonPhase,
    /// The chat entry carrying the message.
    pub message: ChatMessage,
    /// Pool entries consumed by the message's tokens.
    pub consumed: Vec<ConsumedWord>,
    /// Whether this message completed the phase for both players.
    pub completed_phase: bool,
}

/// Emitted when the session's liveness flag is cleared.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionDeactivated {
    /// The session identifier.
    pub session_id: Uuid,
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// A player ended the session.
    PlayerRequest,
    /// The turn counter reached its maximum.
    TurnLimit,
}

/// Emitted when the session ends. Players and the turn are released; the chat
/// log is retained for history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEnded {
    /// The session identifier.
    pub session_id: Uuid,
    /// The Match record to release.
    pub match_id: Uuid,
    /// Why the session ended.
    pub reason: EndReason,
}

/// Event type identifier for [`SessionInitialized`].
pub const SESSION_INITIALIZED_EVENT_TYPE: &str = "session.initialized";
/// Event type identifier for [`CharacterChosen`].
pub const CHARACTER_CHOSEN_EVENT_TYPE: &str = "creation.character_chosen";
/// Event type identifier for [`MoonMeaningChosen`].
pub const MOON_MEANING_CHOSEN_EVENT_TYPE: &str = "creation.moon_meaning_chosen";
/// Event type identifier for [`ProfileCreated`].
pub const PROFILE_CREATED_EVENT_TYPE: &str = "creation.profile_created";
/// Event type identifier for [`RegularTurnStarted`].
pub const REGULAR_TURN_STARTED_EVENT_TYPE: &str = "session.regular_turn_started";
/// Event type identifier for [`QuestionSelected`].
pub const QUESTION_SELECTED_EVENT_TYPE: &str = "turn.question_selected";
/// Event type identifier for [`QuestionAnswered`].
pub const QUESTION_ANSWERED_EVENT_TYPE: &str = "turn.question_answered";
/// Event type identifier for [`EmojiReacted`].
pub const EMOJI_REACTED_EVENT_TYPE: &str = "turn.emoji_reacted";
/// Event type identifier for [`NarrativeChoiceTaken`].
pub const NARRATIVE_CHOICE_TAKEN_EVENT_TYPE: &str = "turn.narrative_choice_taken";
/// Event type identifier for [`NightCompleted`].
pub const NIGHT_COMPLETED_EVENT_TYPE: &str = "turn.night_completed";
/// Event type identifier for [`MoonMessageWritten`].
pub const MOON_MESSAGE_WRITTEN_EVENT_TYPE: &str = "turn.moon_message_written";
/// Event type identifier for [`SessionDeactivated`].
pub const SESSION_DEACTIVATED_EVENT_TYPE: &str = "session.deactivated";
/// Event type identifier for [`SessionEnded`].
pub const SESSION_ENDED_EVENT_TYPE: &str = "session.ended";

/// Event payload variants for the Game Session context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SessionEventKind {
    /// A session was initialized with both players.
    SessionInitialized(SessionInitialized),
    /// A player chose their character.
    CharacterChosen(CharacterChosen),
    /// A player recorded their moon-sign interpretation.
    MoonMeaningChosen(MoonMeaningChosen),
    /// A player completed their public profile.
    ProfileCreated(ProfileCreated),
    /// Regular play began.
    RegularTurnStarted(RegularTurnStarted),
    /// A question was selected.
    QuestionSelected(QuestionSelected),
    /// A question was answered.
    QuestionAnswered(QuestionAnswered),
    /// An emoji reaction was attached.
    EmojiReacted(EmojiReacted),
    /// A narrative choice was taken.
    NarrativeChoiceTaken(NarrativeChoiceTaken),
    /// A narrative night completed.
    NightCompleted(NightCompleted),
    /// A moon-phase message was written.
    MoonMessageWritten(MoonMessageWritten),
    /// The session was deactivated.
    SessionDeactivated(SessionDeactivated),
    /// The session ended.
    SessionEnded(SessionEnded),
}

impl SessionEventKind {
    /// Returns the event type name for this payload.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            SessionEventKind::SessionInitialized(_) => SESSION_INITIALIZED_EVENT_TYPE,
            SessionEventKind::CharacterChosen(_) => CHARACTER_CHOSEN_EVENT_TYPE,
            SessionEventKind::MoonMeaningChosen(_) => MOON_MEANING_CHOSEN_EVENT_TYPE,
            SessionEventKind::ProfileCreated(_) => PROFILE_CREATED_EVENT_TYPE,
            SessionEventKind::RegularTurnStarted(_) => REGULAR_TURN_STARTED_EVENT_TYPE,
            SessionEventKind::QuestionSelected(_) => QUESTION_SELECTED_EVENT_TYPE,
            SessionEventKind::QuestionAnswered(_) => QUESTION_ANSWERED_EVENT_TYPE,
            SessionEventKind::EmojiReacted(_) => EMOJI_REACTED_EVENT_TYPE,
            SessionEventKind::NarrativeChoiceTaken(_) => NARRATIVE_CHOICE_TAKEN_EVENT_TYPE,
            SessionEventKind::NightCompleted(_) => NIGHT_COMPLETED_EVENT_TYPE,
            SessionEventKind::MoonMessageWritten(_) => MOON_MESSAGE_WRITTEN_EVENT_TYPE,
            SessionEventKind::SessionDeactivated(_) => SESSION_DEACTIVATED_EVENT_TYPE,
            SessionEventKind::SessionEnded(_) => SESSION_ENDED_EVENT_TYPE,
        }
    }
}

/// Domain event envelope for the Game Session context.
#[derive(Debug, Clone)]
pub struct SessionEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: SessionEventKind,
}

impl DomainEvent for SessionEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("SessionEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
