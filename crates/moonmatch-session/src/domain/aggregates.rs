//! The `GameSession` aggregate root.
//!
//! The session owns its whole cluster — both player slots, the current turn,
//! the chat log, and the asked-question set. Every transition validates the
//! session state, the turn sub-state, and turn ownership before producing an
//! event; a rejected command leaves no trace.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use moonmatch_content::{NarrativeChoice, Question, Word};
use moonmatch_core::aggregate::AggregateRoot;
use moonmatch_core::clock::Clock;
use moonmatch_core::error::DomainError;
use moonmatch_core::event::EventMetadata;

use super::chat::ChatMessage;
use super::events::{
    CharacterChosen, EmojiReacted, EndReason, MoonMeaningChosen, MoonMessageWritten,
    NarrativeChoiceTaken, NightCompleted, ProfileCreated, QuestionAnswered, QuestionSelected,
    RegularTurnStarted, SessionDeactivated, SessionEnded, SessionEvent, SessionEventKind,
    SessionInitialized,
};
use super::player::{CharacterRef, CreationState, MoonSignInterpretation, Player};
use super::turn::{MAX_TURNS, MoonPhase, PlayerRole, Turn, TurnState};
use super::word_pools::{PoolKind, plan_consumption};

/// Top-level lifecycle of a session.
///
/// "Inactive" is not a state here: liveness is the orthogonal `is_active`
/// flag, cleared without touching the lifecycle position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Initializing,
    CharacterCreation,
    RegularTurn,
    Ended,
}

/// Pool grants computed for one `create_public_profile` call.
#[derive(Debug, Clone, Default)]
pub struct ProfileGrant {
    /// Thematic words drawn from the chosen qualities.
    pub character_words: Vec<Word>,
    /// Questions drawn from the chosen activities.
    pub questions: Vec<Uuid>,
    /// Narrative choices granted by the chosen interests.
    pub narrative_choices: Vec<Uuid>,
    /// Simple words drawn by the initial replenishment.
    pub simple_words: Vec<Word>,
}

/// The aggregate root for one two-player game session.
#[derive(Debug)]
pub struct GameSession {
    /// Aggregate identifier (the opaque game id).
    pub id: Uuid,
    /// Current version (event count).
    pub(crate) version: i64,
    state: SessionState,
    is_active: bool,
    match_id: Option<Uuid>,
    players: Option<[Player; 2]>,
    turn: Option<Turn>,
    log: Vec<ChatMessage>,
    asked_questions: BTreeSet<Uuid>,
    /// Uncommitted events pending persistence.
    uncommitted_events: Vec<SessionEvent>,
}

impl GameSession {
    /// Creates an empty session awaiting initialization.
    #[must_use]
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            version: 0,
            state: SessionState::Initializing,
            is_active: true,
            match_id: None,
            players: None,
            turn: None,
            log: Vec::new(),
            asked_questions: BTreeSet::new(),
            uncommitted_events: Vec::new(),
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Liveness flag, orthogonal to the lifecycle state.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// The Match record that spawned this session.
    #[must_use]
    pub fn match_id(&self) -> Option<Uuid> {
        self.match_id
    }

    /// The player in a slot, if players have not been released.
    #[must_use]
    pub fn player(&self, role: PlayerRole) -> Option<&Player> {
        self.players.as_ref().map(|p| &p[role.index()])
    }

    /// The current turn, if not released.
    #[must_use]
    pub fn turn(&self) -> Option<&Turn> {
        self.turn.as_ref()
    }

    /// The chat log, retained even after the session ends.
    #[must_use]
    pub fn log(&self) -> &[ChatMessage] {
        &self.log
    }

    /// Questions already asked in this session.
    #[must_use]
    pub fn asked_questions(&self) -> &BTreeSet<Uuid> {
        &self.asked_questions
    }

    /// Resolves an acting user to their player slot.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the players have been released or
    /// the user is not one of the session's two players.
    pub fn participant(&self, user_id: Uuid) -> Result<PlayerRole, DomainError> {
        let players = self.players.as_ref().ok_or_else(|| {
            DomainError::Validation("session players have been released".to_owned())
        })?;
        if players[0].user_id == user_id {
            Ok(PlayerRole::A)
        } else if players[1].user_id == user_id {
            Ok(PlayerRole::B)
        } else {
            Err(DomainError::Validation(format!(
                "user {user_id} is not a participant of this session"
            )))
        }
    }

    /// Assigns both players, creates the log and the opening turn, and moves
    /// to character creation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the session was already
    /// initialized or either player slot is unset.
    pub fn initialize(
        &mut self,
        match_id: Uuid,
        player_a: Option<Uuid>,
        player_b: Option<Uuid>,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        if self.state != SessionState::Initializing {
            return Err(DomainError::Validation(
                "session has already been initialized".to_owned(),
            ));
        }
        let (Some(player_a), Some(player_b)) = (player_a, player_b) else {
            return Err(DomainError::Validation(
                "both players must be assigned before a session can start".to_owned(),
            ));
        };

        self.push(
            SessionEventKind::SessionInitialized(SessionInitialized {
                session_id: self.id,
                match_id,
                player_a,
                player_b,
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Records a player's avatar choice: AvatarSelection → MoonMeaningSelection.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the session is not in character
    /// creation, the user is not a participant, or the player already chose.
    pub fn choose_character(
        &mut self,
        user_id: Uuid,
        character: CharacterRef,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        self.require_state(SessionState::CharacterCreation)?;
        let role = self.participant(user_id)?;
        self.require_creation_state(role, CreationState::AvatarSelection)?;

        self.push(
            SessionEventKind::CharacterChosen(CharacterChosen {
                session_id: self.id,
                role,
                character,
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Records a player's moon-sign interpretation:
    /// MoonMeaningSelection → PublicProfileCreation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` on state or participant violations.
    pub fn choose_moon_meaning(
        &mut self,
        user_id: Uuid,
        interpretation: MoonSignInterpretation,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        self.require_state(SessionState::CharacterCreation)?;
        let role = self.participant(user_id)?;
        self.require_creation_state(role, CreationState::MoonMeaningSelection)?;

        self.push(
            SessionEventKind::MoonMeaningChosen(MoonMeaningChosen {
                session_id: self.id,
                role,
                interpretation,
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Completes a player's public profile with the drawn pool grants:
    /// PublicProfileCreation → Complete.
    ///
    /// The caller is responsible for checking afterwards whether both players
    /// are complete and then invoking [`GameSession::start_regular_turn`].
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` on state or participant violations.
    pub fn create_public_profile(
        &mut self,
        user_id: Uuid,
        grant: ProfileGrant,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        self.require_state(SessionState::CharacterCreation)?;
        let role = self.participant(user_id)?;
        self.require_creation_state(role, CreationState::PublicProfileCreation)?;
        let display_name = self
            .require_player(role)?
            .display_name()
            .ok_or_else(|| {
                DomainError::Validation("player has not chosen a character".to_owned())
            })?
            .to_owned();

        self.push(
            SessionEventKind::ProfileCreated(ProfileCreated {
                session_id: self.id,
                role,
                display_name,
                character_words: grant.character_words,
                questions: grant.questions,
                narrative_choices: grant.narrative_choices,
                simple_words: grant.simple_words,
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Whether a player slot has finished character creation, counting
    /// events emitted by the current command batch.
    #[must_use]
    pub fn creation_complete(&self, role: PlayerRole) -> bool {
        if self
            .player(role)
            .is_some_and(|p| p.creation_state == CreationState::Complete)
        {
            return true;
        }
        self.uncommitted_events.iter().any(|e| {
            matches!(&e.kind, SessionEventKind::ProfileCreated(p) if p.role == role)
        })
    }

    /// Begins regular play: CharacterCreation → RegularTurn. No side effects
    /// beyond the state flag.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` unless called from character
    /// creation.
    pub fn start_regular_turn(
        &mut self,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        self.require_state(SessionState::CharacterCreation)?;

        self.push(
            SessionEventKind::RegularTurnStarted(RegularTurnStarted {
                session_id: self.id,
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// The active player asks a question: SelectQuestion → AnswerQuestion.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotYourTurn` if the user is not the active
    /// player, and `DomainError::Validation` on state violations or when the
    /// question was already asked.
    pub fn select_question(
        &mut self,
        user_id: Uuid,
        question: &Question,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        self.require_state(SessionState::RegularTurn)?;
        self.require_turn_state(TurnState::SelectQuestion)?;
        let role = self.participant(user_id)?;
        self.require_active(role, user_id)?;
        if self.asked_questions.contains(&question.id) {
            return Err(DomainError::Validation(format!(
                "question {} has already been asked",
                question.id
            )));
        }
        let message = self.authored_message(role, &question.text, clock)?;

        self.push(
            SessionEventKind::QuestionSelected(QuestionSelected {
                session_id: self.id,
                role,
                question_id: question.id,
                message,
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// The active player answers: AnswerQuestion → ReactEmoji. Tokens of the
    /// answer consume matching pool entries, simple pool first.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotYourTurn` if the user is not the active
    /// player, and `DomainError::Validation` on state violations.
    pub fn answer_question(
        &mut self,
        user_id: Uuid,
        answer_text: &str,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        self.require_state(SessionState::RegularTurn)?;
        self.require_turn_state(TurnState::AnswerQuestion)?;
        let role = self.participant(user_id)?;
        self.require_active(role, user_id)?;
        let player = self.require_player(role)?;
        let consumed = plan_consumption(&player.simple_words, &player.character_words, answer_text);
        let message = self.authored_message(role, answer_text, clock)?;

        self.push(
            SessionEventKind::QuestionAnswered(QuestionAnswered {
                session_id: self.id,
                role,
                message,
                consumed,
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// The active player reacts to the latest message:
    /// ReactEmoji → SelectQuestion, or NarrativeChoices once both players
    /// completed a full cycle.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the emoji is empty or on state
    /// violations, `DomainError::NotYourTurn` for the wrong player.
    pub fn react_with_emoji(
        &mut self,
        user_id: Uuid,
        emoji: &str,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        if emoji.trim().is_empty() {
            return Err(DomainError::Validation(
                "emoji reaction cannot be empty".to_owned(),
            ));
        }
        self.require_state(SessionState::RegularTurn)?;
        let turn = self.require_turn_state(TurnState::ReactEmoji)?;
        let completed_cycle = turn.cycle_done.is_set(turn.active.other());
        let role = self.participant(user_id)?;
        self.require_active(role, user_id)?;
        if self.log.is_empty() {
            return Err(DomainError::Validation(
                "there is no message to react to".to_owned(),
            ));
        }

        self.push(
            SessionEventKind::EmojiReacted(EmojiReacted {
                session_id: self.id,
                role,
                emoji: emoji.to_owned(),
                completed_cycle,
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// A player takes a narrative choice. The phase self-loops until both
    /// players have chosen; completion increments the turn and night counters
    /// and routes the next phase (moon checkpoint or question selection), or
    /// ends the session at the turn limit.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` on state violations, when the player
    /// already chose this night, or when the choice is not in their pool.
    pub fn make_narrative_choice(
        &mut self,
        user_id: Uuid,
        choice: &NarrativeChoice,
        replenished: Vec<Word>,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        self.require_state(SessionState::RegularTurn)?;
        let turn = self.require_turn_state(TurnState::NarrativeChoices)?;
        let (turn_number, night) = (turn.number, turn.night);
        let role = self.participant(user_id)?;
        if self.require_turn()?.narrative_done.is_set(role) {
            return Err(DomainError::Validation(
                "narrative choice already made this night".to_owned(),
            ));
        }
        let player = self.require_player(role)?;
        if !player.narrative_choice_pool.contains(&choice.id) {
            return Err(DomainError::Validation(format!(
                "narrative choice {} is not available to this player",
                choice.id
            )));
        }
        let both_done = self.require_turn()?.narrative_done.is_set(role.other());

        self.push(
            SessionEventKind::NarrativeChoiceTaken(NarrativeChoiceTaken {
                session_id: self.id,
                role,
                choice_id: choice.id,
                granted: choice.words.iter().cloned().collect(),
                replenished,
            }),
            correlation_id,
            clock,
        );

        if both_done {
            let next_turn = turn_number + 1;
            if next_turn >= MAX_TURNS {
                let match_id = self.require_match_id()?;
                self.push(
                    SessionEventKind::SessionEnded(SessionEnded {
                        session_id: self.id,
                        match_id,
                        reason: EndReason::TurnLimit,
                    }),
                    correlation_id,
                    clock,
                );
            } else {
                let next_state = if MoonPhase::for_turn(next_turn).is_some() {
                    TurnState::MoonPhase
                } else {
                    TurnState::SelectQuestion
                };
                self.push(
                    SessionEventKind::NightCompleted(NightCompleted {
                        session_id: self.id,
                        turn_number: next_turn,
                        night: night + 1,
                        next_state,
                    }),
                    correlation_id,
                    clock,
                );
            }
        }
        Ok(())
    }

    /// The active player writes their moon-phase message. The message
    /// overwrites that phase's entry in the player's moon-sign interpretation
    /// and consumes pool tokens like an answer. Only when both players have
    /// written does the turn return to SelectQuestion.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotYourTurn` for the wrong player and
    /// `DomainError::Validation` on state violations.
    pub fn write_moon_message(
        &mut self,
        user_id: Uuid,
        message_text: &str,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        self.require_state(SessionState::RegularTurn)?;
        let turn = self.require_turn_state(TurnState::MoonPhase)?;
        let turn_number = turn.number;
        let role = self.participant(user_id)?;
        self.require_active(role, user_id)?;
        let turn = self.require_turn()?;
        if turn.moon_written.is_set(role) {
            return Err(DomainError::Validation(
                "moon message already written for this phase".to_owned(),
            ));
        }
        let completed_phase = turn.moon_written.is_set(role.other());
        let phase = MoonPhase::for_turn(turn_number).ok_or_else(|| {
            DomainError::Validation(format!(
                "no moon phase is scheduled for turn {turn_number}"
            ))
        })?;
        let player = self.require_player(role)?;
        let consumed = plan_consumption(&player.simple_words, &player.character_words, message_text);
        let message = self.authored_message(role, message_text, clock)?;

        self.push(
            SessionEventKind::MoonMessageWritten(MoonMessageWritten {
                session_id: self.id,
                role,
                phase,
                message,
                consumed,
                completed_phase,
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Clears the liveness flag. Callable from any state; a no-op when the
    /// session is already inactive.
    pub fn set_inactive(&mut self, correlation_id: Uuid, clock: &dyn Clock) {
        if !self.is_active {
            return;
        }
        self.push(
            SessionEventKind::SessionDeactivated(SessionDeactivated {
                session_id: self.id,
            }),
            correlation_id,
            clock,
        );
    }

    /// Ends the session, releasing players and the turn while retaining the
    /// log. Returns `false` without emitting anything when the session is
    /// already ended, making double invocation harmless.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `requested_by` is set but is not
    /// a participant, or if the session was never initialized.
    pub fn end_session(
        &mut self,
        requested_by: Option<Uuid>,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<bool, DomainError> {
        if self.state == SessionState::Ended {
            return Ok(false);
        }
        if let Some(user_id) = requested_by {
            self.participant(user_id)?;
        }
        let match_id = self.require_match_id()?;

        self.push(
            SessionEventKind::SessionEnded(SessionEnded {
                session_id: self.id,
                match_id,
                reason: EndReason::PlayerRequest,
            }),
            correlation_id,
            clock,
        );
        Ok(true)
    }

    fn require_state(&self, expected: SessionState) -> Result<(), DomainError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(DomainError::Validation(format!(
                "session is in the {:?} state",
                self.state
            )))
        }
    }

    fn require_turn(&self) -> Result<&Turn, DomainError> {
        self.turn
            .as_ref()
            .ok_or_else(|| DomainError::Validation("session has no current turn".to_owned()))
    }

    fn require_turn_state(&self, expected: TurnState) -> Result<&Turn, DomainError> {
        let turn = self.require_turn()?;
        if turn.state == expected {
            Ok(turn)
        } else {
            Err(DomainError::Validation(format!(
                "turn is in the {:?} phase",
                turn.state
            )))
        }
    }

    fn require_active(&self, role: PlayerRole, user_id: Uuid) -> Result<(), DomainError> {
        if self.require_turn()?.active == role {
            Ok(())
        } else {
            Err(DomainError::NotYourTurn(user_id))
        }
    }

    fn require_player(&self, role: PlayerRole) -> Result<&Player, DomainError> {
        self.player(role).ok_or_else(|| {
            DomainError::Validation("session players have been released".to_owned())
        })
    }

    fn require_creation_state(
        &self,
        role: PlayerRole,
        expected: CreationState,
    ) -> Result<(), DomainError> {
        let player = self.require_player(role)?;
        if player.creation_state == expected {
            Ok(())
        } else {
            Err(DomainError::Validation(format!(
                "player is in the {:?} creation step",
                player.creation_state
            )))
        }
    }

    fn require_match_id(&self) -> Result<Uuid, DomainError> {
        self.match_id.ok_or_else(|| {
            DomainError::Validation("session has not been initialized".to_owned())
        })
    }

    /// Builds a chat entry authored by a player's character.
    fn authored_message(
        &self,
        role: PlayerRole,
        text: &str,
        clock: &dyn Clock,
    ) -> Result<ChatMessage, DomainError> {
        let player = self.require_player(role)?;
        let character = player.character.as_ref().ok_or_else(|| {
            DomainError::Validation("player has not chosen a character".to_owned())
        })?;
        Ok(ChatMessage {
            avatar_url: character.avatar_url.clone(),
            sender: character.name.clone(),
            text: text.to_owned(),
            reaction: None,
            timestamp: clock.now(),
        })
    }

    /// Returns the next sequence number for a new event.
    #[allow(clippy::cast_possible_wrap)]
    fn next_sequence_number(&self) -> i64 {
        self.version + self.uncommitted_events.len() as i64 + 1
    }

    fn push(&mut self, kind: SessionEventKind, correlation_id: Uuid, clock: &dyn Clock) {
        let event = SessionEvent {
            metadata: EventMetadata {
                event_id: Uuid::new_v4(),
                event_type: kind.event_type().to_owned(),
                aggregate_id: self.id,
                sequence_number: self.next_sequence_number(),
                correlation_id,
                causation_id: correlation_id,
                occurred_at: clock.now(),
            },
            kind,
        };
        self.uncommitted_events.push(event);
    }

    fn player_mut(&mut self, role: PlayerRole) -> Option<&mut Player> {
        self.players.as_mut().map(|p| &mut p[role.index()])
    }
}

impl AggregateRoot for GameSession {
    type Event = SessionEvent;

    fn aggregate_id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        match &event.kind {
            SessionEventKind::SessionInitialized(payload) => {
                self.match_id = Some(payload.match_id);
                self.players = Some([Player::new(payload.player_a), Player::new(payload.player_b)]);
                self.turn = Some(Turn::first());
                self.log = Vec::new();
                self.state = SessionState::CharacterCreation;
                self.is_active = true;
            }
            SessionEventKind::CharacterChosen(payload) => {
                if let Some(player) = self.player_mut(payload.role) {
                    player.character = Some(payload.character.clone());
                    player.creation_state = CreationState::MoonMeaningSelection;
                }
            }
            SessionEventKind::MoonMeaningChosen(payload) => {
                if let Some(player) = self.player_mut(payload.role) {
                    player.moon_sign = Some(payload.interpretation.clone());
                    player.creation_state = CreationState::PublicProfileCreation;
                }
            }
            SessionEventKind::ProfileCreated(payload) => {
                if let Some(player) = self.player_mut(payload.role) {
                    player.character_words.extend(payload.character_words.iter().cloned());
                    player.question_pool.extend(payload.questions.iter().copied());
                    player
                        .narrative_choice_pool
                        .extend(payload.narrative_choices.iter().copied());
                    player.simple_words.extend(payload.simple_words.iter().cloned());
                    player.creation_state = CreationState::Complete;
                }
            }
            SessionEventKind::RegularTurnStarted(_) => {
                self.state = SessionState::RegularTurn;
            }
            SessionEventKind::QuestionSelected(payload) => {
                self.asked_questions.insert(payload.question_id);
                self.log.push(payload.message.clone());
                if let Some(turn) = self.turn.as_mut() {
                    turn.state = TurnState::AnswerQuestion;
                    turn.switch_active();
                }
            }
            SessionEventKind::QuestionAnswered(payload) => {
                self.log.push(payload.message.clone());
                self.remove_consumed(payload.role, &payload.consumed);
                if let Some(turn) = self.turn.as_mut() {
                    turn.state = TurnState::ReactEmoji;
                    turn.switch_active();
                }
            }
            SessionEventKind::EmojiReacted(payload) => {
                if let Some(last) = self.log.last_mut() {
                    last.reaction = Some(payload.emoji.clone());
                }
                if let Some(turn) = self.turn.as_mut() {
                    if payload.completed_cycle {
                        turn.cycle_done.clear();
                        turn.state = TurnState::NarrativeChoices;
                    } else {
                        turn.cycle_done.set(payload.role);
                        turn.state = TurnState::SelectQuestion;
                    }
                    turn.switch_active();
                }
            }
            SessionEventKind::NarrativeChoiceTaken(payload) => {
                if let Some(turn) = self.turn.as_mut() {
                    turn.narrative_done.set(payload.role);
                }
                if let Some(player) = self.player_mut(payload.role) {
                    player.narrative_choice_pool.remove(&payload.choice_id);
                    player.character_words.extend(payload.granted.iter().cloned());
                    player.simple_words.extend(payload.replenished.iter().cloned());
                }
            }
            SessionEventKind::NightCompleted(payload) => {
                if let Some(turn) = self.turn.as_mut() {
                    turn.narrative_done.clear();
                    turn.number = payload.turn_number;
                    turn.night = payload.night;
                    turn.state = payload.next_state;
                    turn.switch_active();
                }
            }
            SessionEventKind::MoonMessageWritten(payload) => {
                if let Some(player) = self.player_mut(payload.role) {
                    if let Some(sign) = player.moon_sign.as_mut() {
                        sign.set_meaning(payload.phase, &payload.message.text);
                    }
                }
                self.log.push(payload.message.clone());
                self.remove_consumed(payload.role, &payload.consumed);
                if let Some(turn) = self.turn.as_mut() {
                    if payload.completed_phase {
                        turn.moon_written.clear();
                        turn.state = TurnState::SelectQuestion;
                    } else {
                        turn.moon_written.set(payload.role);
                    }
                    turn.switch_active();
                }
            }
            SessionEventKind::SessionDeactivated(_) => {
                self.is_active = false;
            }
            SessionEventKind::SessionEnded(_) => {
                self.state = SessionState::Ended;
                self.is_active = false;
                self.players = None;
                self.turn = None;
            }
        }
        self.version += 1;
    }

    fn uncommitted_events(&self) -> &[Self::Event] {
        &self.uncommitted_events
    }

    fn clear_uncommitted_events(&mut self) {
        self.uncommitted_events.clear();
    }
}

impl GameSession {
    fn remove_consumed(&mut self, role: PlayerRole, consumed: &[super::word_pools::ConsumedWord]) {
        if let Some(player) = self.player_mut(role) {
            for entry in consumed {
                match entry.from {
                    PoolKind::Simple => {
                        player.simple_words.remove(&entry.word);
                    }
                    PoolKind::Character => {
                        player.character_words.remove(&entry.word);
                    }
                }
            }
        }
    }
}
