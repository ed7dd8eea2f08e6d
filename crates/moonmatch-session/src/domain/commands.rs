//! Commands for the Game Session context.
//!
//! Every player action arrives as one command carrying the session id, the
//! acting user, and the action payload.

use uuid::Uuid;

use moonmatch_core::command::Command;

use super::player::MoonSignInterpretation;

/// Command to spawn a session from a fresh Match.
#[derive(Debug, Clone)]
pub struct InitializeSession {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The Match record that paired the users.
    pub match_id: Uuid,
    /// User for slot A, if assigned.
    pub player_a: Option<Uuid>,
    /// User for slot B, if assigned.
    pub player_b: Option<Uuid>,
}

impl Command for InitializeSession {
    fn command_type(&self) -> &'static str {
        "session.initialize"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to pick a character avatar during creation.
#[derive(Debug, Clone)]
pub struct ChooseCharacter {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session identifier.
    pub game_id: Uuid,
    /// The acting user.
    pub user_id: Uuid,
    /// The catalog character to play.
    pub character_id: Uuid,
}

impl Command for ChooseCharacter {
    fn command_type(&self) -> &'static str {
        "creation.choose_character"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to record a moon-sign interpretation during creation.
#[derive(Debug, Clone)]
pub struct ChooseMoonMeaning {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session identifier.
    pub game_id: Uuid,
    /// The acting user.
    pub user_id: Uuid,
    /// The four-phase interpretation document.
    pub interpretation: MoonSignInterpretation,
}

impl Command for ChooseMoonMeaning {
    fn command_type(&self) -> &'static str {
        "creation.choose_moon_meaning"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to complete the public profile during creation.
///
/// Slots may be left empty (`None`); empty slots are skipped, not errors.
#[derive(Debug, Clone)]
pub struct CreatePublicProfile {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session identifier.
    pub game_id: Uuid,
    /// The acting user.
    pub user_id: Uuid,
    /// Up to three chosen qualities.
    pub qualities: Vec<Option<Uuid>>,
    /// Up to three chosen interests.
    pub interests: Vec<Option<Uuid>>,
    /// Up to two chosen activities.
    pub activities: Vec<Option<Uuid>>,
}

impl Command for CreatePublicProfile {
    fn command_type(&self) -> &'static str {
        "creation.create_public_profile"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to select the next question.
#[derive(Debug, Clone)]
pub struct SelectQuestion {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session identifier.
    pub game_id: Uuid,
    /// The acting user.
    pub user_id: Uuid,
    /// The question to ask.
    pub question_id: Uuid,
}

impl Command for SelectQuestion {
    fn command_type(&self) -> &'static str {
        "turn.select_question"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to answer the pending question.
#[derive(Debug, Clone)]
pub struct AnswerQuestion {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session identifier.
    pub game_id: Uuid,
    /// The acting user.
    pub user_id: Uuid,
    /// The free-text answer.
    pub answer: String,
}

impl Command for AnswerQuestion {
    fn command_type(&self) -> &'static str {
        "turn.answer_question"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to react to the latest message with an emoji.
#[derive(Debug, Clone)]
pub struct ReactWithEmoji {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session identifier.
    pub game_id: Uuid,
    /// The acting user.
    pub user_id: Uuid,
    /// The emoji reaction.
    pub emoji: String,
}

impl Command for ReactWithEmoji {
    fn command_type(&self) -> &'static str {
        "turn.react_with_emoji"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to take a narrative choice.
#[derive(Debug, Clone)]
pub struct MakeNarrativeChoice {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session identifier.
    pub game_id: Uuid,
    /// The acting user.
    pub user_id: Uuid,
    /// The narrative choice to take.
    pub choice_id: Uuid,
}

impl Command for MakeNarrativeChoice {
    fn command_type(&self) -> &'static str {
        "turn.make_narrative_choice"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to write the moon-phase message.
#[derive(Debug, Clone)]
pub struct WriteMoonMessage {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session identifier.
    pub game_id: Uuid,
    /// The acting user.
    pub user_id: Uuid,
    /// The free-text moon message.
    pub message: String,
}

impl Command for WriteMoonMessage {
    fn command_type(&self) -> &'static str {
        "turn.write_moon_message"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to clear the session's liveness flag (abandonment janitor).
#[derive(Debug, Clone)]
pub struct DeactivateSession {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session identifier.
    pub game_id: Uuid,
}

impl Command for DeactivateSession {
    fn command_type(&self) -> &'static str {
        "session.deactivate"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to end the session and release its players.
#[derive(Debug, Clone)]
pub struct EndSession {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session identifier.
    pub game_id: Uuid,
    /// The requesting user; `None` for system-initiated teardown.
    pub requested_by: Option<Uuid>,
}

impl Command for EndSession {
    fn command_type(&self) -> &'static str {
        "session.end"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
