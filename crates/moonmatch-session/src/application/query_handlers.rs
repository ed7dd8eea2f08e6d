//! Query handlers for the Game Session context.
//!
//! Queries reconstitute the aggregate from stored events and return read-only
//! view DTOs for the transport layer to render.

use serde::Serialize;
use uuid::Uuid;

use moonmatch_content::Word;
use moonmatch_core::error::DomainError;
use moonmatch_core::repository::EventRepository;

use crate::application::command_handlers;
use crate::domain::aggregates::{GameSession, SessionState};
use crate::domain::chat::ChatMessage;
use crate::domain::player::{CreationState, MoonSignInterpretation, Player};
use crate::domain::turn::{PlayerRole, TurnState};

/// Read-only view of the current turn.
#[derive(Debug, Serialize)]
pub struct TurnView {
    /// Turn counter.
    pub number: u32,
    /// Narrative nights completed.
    pub night: u32,
    /// Current sub-state.
    pub state: TurnState,
    /// The user whose action is expected next.
    pub active_user_id: Uuid,
}

/// Read-only view of one player slot.
#[derive(Debug, Serialize)]
pub struct PlayerView {
    /// The matched user occupying this slot.
    pub user_id: Uuid,
    /// Character-creation progress.
    pub creation_state: CreationState,
    /// Display name, set once a character is chosen.
    pub display_name: Option<String>,
    /// Avatar of the chosen character.
    pub avatar_url: String,
    /// Earned thematic vocabulary.
    pub character_words: Vec<Word>,
    /// Replenished grammatical scaffolding.
    pub simple_words: Vec<Word>,
    /// Questions available for selection.
    pub question_pool: Vec<Uuid>,
    /// Narrative choices available to take.
    pub narrative_choice_pool: Vec<Uuid>,
    /// Moon-sign interpretation, if recorded.
    pub moon_sign: Option<MoonSignInterpretation>,
}

impl PlayerView {
    fn from_player(player: &Player) -> Self {
        Self {
            user_id: player.user_id,
            creation_state: player.creation_state,
            display_name: player.display_name().map(str::to_owned),
            avatar_url: player.avatar_url().to_owned(),
            character_words: player.character_words.iter().cloned().collect(),
            simple_words: player.simple_words.iter().cloned().collect(),
            question_pool: player.question_pool.iter().copied().collect(),
            narrative_choice_pool: player.narrative_choice_pool.iter().copied().collect(),
            moon_sign: player.moon_sign.clone(),
        }
    }
}

/// Read-only view of a game session aggregate.
#[derive(Debug, Serialize)]
pub struct GameSessionView {
    /// The session (game) identifier.
    pub game_id: Uuid,
    /// Lifecycle state label; an ongoing session with a cleared liveness flag
    /// reads as "inactive".
    pub state: &'static str,
    /// Liveness flag.
    pub is_active: bool,
    /// The originating Match record, if initialized.
    pub match_id: Option<Uuid>,
    /// The current turn, released once the session ends.
    pub turn: Option<TurnView>,
    /// Both player slots, released once the session ends.
    pub players: Vec<PlayerView>,
    /// The chat log, retained for history.
    pub chat: Vec<ChatMessage>,
    /// Questions already asked.
    pub asked_questions: Vec<Uuid>,
    /// Current version (event count).
    pub version: i64,
}

fn state_label(session: &GameSession) -> &'static str {
    match session.state() {
        SessionState::Ended => "ended",
        _ if !session.is_active() => "inactive",
        SessionState::Initializing => "initializing",
        SessionState::CharacterCreation => "character_creation",
        SessionState::RegularTurn => "regular_turn",
    }
}

/// Retrieves a game session by its aggregate ID.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if no events exist for the ID.
/// Returns `DomainError::Infrastructure` if event deserialization fails.
pub async fn get_session_by_id(
    game_id: Uuid,
    repo: &dyn EventRepository,
) -> Result<GameSessionView, DomainError> {
    let stored_events = repo.load_events(game_id).await?;
    if stored_events.is_empty() {
        return Err(DomainError::AggregateNotFound(game_id));
    }
    let session = command_handlers::reconstitute(game_id, &stored_events)?;

    let turn = session.turn().map(|turn| TurnView {
        number: turn.number,
        night: turn.night,
        state: turn.state,
        active_user_id: session
            .player(turn.active)
            .map(|p| p.user_id)
            .unwrap_or_default(),
    });
    let players = [PlayerRole::A, PlayerRole::B]
        .into_iter()
        .filter_map(|role| session.player(role))
        .map(PlayerView::from_player)
        .collect();

    Ok(GameSessionView {
        game_id,
        state: state_label(&session),
        is_active: session.is_active(),
        match_id: session.match_id(),
        turn,
        players,
        chat: session.log().to_vec(),
        asked_questions: session.asked_questions().iter().copied().collect(),
        version: session.version,
    })
}
