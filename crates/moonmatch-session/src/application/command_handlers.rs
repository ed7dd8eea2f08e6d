//! Command handlers for the Game Session context.
//!
//! Each handler is one atomic player action: load the aggregate from its
//! event stream, resolve catalog references, execute the domain command, and
//! persist the produced events with the pre-command version as the optimistic
//! concurrency check. A losing racer gets a conflict or a "not your turn"
//! rejection, never a silent overwrite.

use uuid::Uuid;

use moonmatch_content::{Catalog, Word};
use moonmatch_core::aggregate::AggregateRoot;
use moonmatch_core::clock::Clock;
use moonmatch_core::error::DomainError;
use moonmatch_core::event::DomainEvent;
use moonmatch_core::matchmaking::MatchRegistry;
use moonmatch_core::repository::{EventRepository, StoredEvent};
use moonmatch_core::rng::DeterministicRng;

use crate::domain::aggregates::{GameSession, ProfileGrant};
use crate::domain::commands::{
    AnswerQuestion, ChooseCharacter, ChooseMoonMeaning, CreatePublicProfile, DeactivateSession,
    EndSession, InitializeSession, MakeNarrativeChoice, ReactWithEmoji, SelectQuestion,
    WriteMoonMessage,
};
use crate::domain::events::{SessionEvent, SessionEventKind};
use crate::domain::player::CharacterRef;
use crate::domain::word_pools::plan_replenishment;

/// Result of a successfully handled command.
#[derive(Debug)]
pub struct SessionCommandResult {
    /// The aggregate ID affected or created by the command.
    pub aggregate_id: Uuid,
    /// The stored events produced and persisted.
    pub stored_events: Vec<StoredEvent>,
}

fn to_stored_event(event: &SessionEvent) -> StoredEvent {
    let meta = event.metadata();
    StoredEvent {
        event_id: meta.event_id,
        aggregate_id: meta.aggregate_id,
        event_type: event.event_type().to_owned(),
        payload: event.to_payload(),
        sequence_number: meta.sequence_number,
        correlation_id: meta.correlation_id,
        causation_id: meta.causation_id,
        occurred_at: meta.occurred_at,
    }
}

/// Reconstitutes a `GameSession` from stored events.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if event deserialization fails.
pub(crate) fn reconstitute(
    game_id: Uuid,
    existing_events: &[StoredEvent],
) -> Result<GameSession, DomainError> {
    let mut session = GameSession::new(game_id);
    for stored in existing_events {
        let kind: SessionEventKind =
            serde_json::from_value(stored.payload.clone()).map_err(|e| {
                DomainError::Infrastructure(format!("event deserialization failed: {e}"))
            })?;
        let event = SessionEvent {
            metadata: moonmatch_core::event::EventMetadata {
                event_id: stored.event_id,
                event_type: stored.event_type.clone(),
                aggregate_id: stored.aggregate_id,
                sequence_number: stored.sequence_number,
                correlation_id: stored.correlation_id,
                causation_id: stored.causation_id,
                occurred_at: stored.occurred_at,
            },
            kind,
        };
        session.apply(&event);
    }
    Ok(session)
}

/// Loads and reconstitutes a session, or reports it missing.
async fn load_session(
    game_id: Uuid,
    repo: &dyn EventRepository,
) -> Result<GameSession, DomainError> {
    let existing_events = repo.load_events(game_id).await?;
    if existing_events.is_empty() {
        return Err(DomainError::AggregateNotFound(game_id));
    }
    reconstitute(game_id, &existing_events)
}

/// Persists the session's uncommitted events against its pre-command version.
async fn persist(
    session: &GameSession,
    repo: &dyn EventRepository,
) -> Result<SessionCommandResult, DomainError> {
    let stored_events: Vec<StoredEvent> = session
        .uncommitted_events()
        .iter()
        .map(to_stored_event)
        .collect();

    repo.append_events(session.id, session.version(), &stored_events)
        .await?;

    Ok(SessionCommandResult {
        aggregate_id: session.id,
        stored_events,
    })
}

/// Handles the `InitializeSession` command: a fresh Match spawns a session
/// with both players assigned.
///
/// This is a CREATION command — the handler generates the `game_id`.
///
/// # Errors
///
/// Returns `DomainError` if either player is unset or event appending fails.
pub async fn handle_initialize_session(
    command: &InitializeSession,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<SessionCommandResult, DomainError> {
    let game_id = Uuid::new_v4();
    let mut session = GameSession::new(game_id);

    session.initialize(
        command.match_id,
        command.player_a,
        command.player_b,
        command.correlation_id,
        clock,
    )?;

    persist(&session, repo).await
}

/// Handles the `ChooseCharacter` command.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` for an unknown session or
/// character, and the domain's validation errors otherwise.
pub async fn handle_choose_character(
    command: &ChooseCharacter,
    clock: &dyn Clock,
    catalog: &Catalog,
    repo: &dyn EventRepository,
) -> Result<SessionCommandResult, DomainError> {
    let mut session = load_session(command.game_id, repo).await?;
    let character = catalog
        .character(command.character_id)
        .ok_or(DomainError::AggregateNotFound(command.character_id))?;

    session.choose_character(
        command.user_id,
        CharacterRef {
            id: character.id,
            name: character.name.clone(),
            avatar_url: character.avatar_url.clone(),
        },
        command.correlation_id,
        clock,
    )?;

    persist(&session, repo).await
}

/// Handles the `ChooseMoonMeaning` command.
///
/// # Errors
///
/// Returns `DomainError` on state violations or persistence failure.
pub async fn handle_choose_moon_meaning(
    command: &ChooseMoonMeaning,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<SessionCommandResult, DomainError> {
    let mut session = load_session(command.game_id, repo).await?;

    session.choose_moon_meaning(
        command.user_id,
        command.interpretation.clone(),
        command.correlation_id,
        clock,
    )?;

    persist(&session, repo).await
}

/// How many thematic words one chosen quality grants.
const WORDS_PER_QUALITY: usize = 15;
/// How many questions one chosen activity grants.
const QUESTIONS_PER_ACTIVITY: usize = 3;
/// Quality and interest slots per profile.
const QUALITY_SLOTS: usize = 3;
const INTEREST_SLOTS: usize = 3;
/// Activity slots per profile.
const ACTIVITY_SLOTS: usize = 2;

/// Handles the `CreatePublicProfile` command: draws the pool grants for the
/// chosen slots (empty slots are skipped), completes the profile, and — when
/// this makes both players complete — starts regular play in the same event
/// batch.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` for unknown slot references, and
/// the domain's validation errors otherwise.
pub async fn handle_create_public_profile(
    command: &CreatePublicProfile,
    clock: &dyn Clock,
    rng: &mut dyn DeterministicRng,
    catalog: &Catalog,
    repo: &dyn EventRepository,
) -> Result<SessionCommandResult, DomainError> {
    let mut session = load_session(command.game_id, repo).await?;
    let role = session.participant(command.user_id)?;

    let mut grant = ProfileGrant::default();

    for quality_id in command.qualities.iter().take(QUALITY_SLOTS).copied().flatten() {
        let quality = catalog
            .quality(quality_id)
            .ok_or(DomainError::AggregateNotFound(quality_id))?;
        let words: Vec<&Word> = quality.words.iter().collect();
        for index in rng.sample_indices(words.len(), WORDS_PER_QUALITY) {
            grant.character_words.push(words[index].clone());
        }
    }

    for activity_id in command.activities.iter().take(ACTIVITY_SLOTS).copied().flatten() {
        let activity = catalog
            .activity(activity_id)
            .ok_or(DomainError::AggregateNotFound(activity_id))?;
        for index in rng.sample_indices(activity.questions.len(), QUESTIONS_PER_ACTIVITY) {
            grant.questions.push(activity.questions[index]);
        }
    }

    for interest_id in command.interests.iter().take(INTEREST_SLOTS).copied().flatten() {
        let interest = catalog
            .interest(interest_id)
            .ok_or(DomainError::AggregateNotFound(interest_id))?;
        grant
            .narrative_choices
            .extend(interest.narrative_choices.iter().copied());
    }

    let simple_pool = session
        .player(role)
        .map(|p| p.simple_words.clone())
        .unwrap_or_default();
    grant.simple_words = plan_replenishment(&simple_pool, catalog.simple_words(), rng);

    session.create_public_profile(command.user_id, grant, command.correlation_id, clock)?;

    // The character-creation component polls for mutual completion and only
    // then flips the session into regular play.
    if session.creation_complete(role.other()) {
        session.start_regular_turn(command.correlation_id, clock)?;
    }

    persist(&session, repo).await
}

/// Handles the `SelectQuestion` command.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` for an unknown question,
/// `DomainError::NotYourTurn` for the wrong player, and validation errors
/// otherwise.
pub async fn handle_select_question(
    command: &SelectQuestion,
    clock: &dyn Clock,
    catalog: &Catalog,
    repo: &dyn EventRepository,
) -> Result<SessionCommandResult, DomainError> {
    let mut session = load_session(command.game_id, repo).await?;
    let question = catalog
        .question(command.question_id)
        .ok_or(DomainError::AggregateNotFound(command.question_id))?;

    session.select_question(command.user_id, question, command.correlation_id, clock)?;

    persist(&session, repo).await
}

/// Handles the `AnswerQuestion` command.
///
/// # Errors
///
/// Returns `DomainError::NotYourTurn` for the wrong player and validation
/// errors otherwise.
pub async fn handle_answer_question(
    command: &AnswerQuestion,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<SessionCommandResult, DomainError> {
    let mut session = load_session(command.game_id, repo).await?;

    session.answer_question(command.user_id, &command.answer, command.correlation_id, clock)?;

    persist(&session, repo).await
}

/// Handles the `ReactWithEmoji` command.
///
/// # Errors
///
/// Returns `DomainError::NotYourTurn` for the wrong player and validation
/// errors otherwise.
pub async fn handle_react_with_emoji(
    command: &ReactWithEmoji,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<SessionCommandResult, DomainError> {
    let mut session = load_session(command.game_id, repo).await?;

    session.react_with_emoji(command.user_id, &command.emoji, command.correlation_id, clock)?;

    persist(&session, repo).await
}

/// Handles the `MakeNarrativeChoice` command: grants the choice's words and
/// replenishes the player's simple pool from the catalog.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` for an unknown choice and
/// validation errors otherwise.
pub async fn handle_make_narrative_choice(
    command: &MakeNarrativeChoice,
    clock: &dyn Clock,
    rng: &mut dyn DeterministicRng,
    catalog: &Catalog,
    repo: &dyn EventRepository,
) -> Result<SessionCommandResult, DomainError> {
    let mut session = load_session(command.game_id, repo).await?;
    let choice = catalog
        .narrative_choice(command.choice_id)
        .ok_or(DomainError::AggregateNotFound(command.choice_id))?;

    let role = session.participant(command.user_id)?;
    let simple_pool = session
        .player(role)
        .map(|p| p.simple_words.clone())
        .unwrap_or_default();
    let replenished = plan_replenishment(&simple_pool, catalog.simple_words(), rng);

    session.make_narrative_choice(
        command.user_id,
        choice,
        replenished,
        command.correlation_id,
        clock,
    )?;

    persist(&session, repo).await
}

/// Handles the `WriteMoonMessage` command.
///
/// # Errors
///
/// Returns `DomainError::NotYourTurn` for the wrong player and validation
/// errors otherwise.
pub async fn handle_write_moon_message(
    command: &WriteMoonMessage,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<SessionCommandResult, DomainError> {
    let mut session = load_session(command.game_id, repo).await?;

    session.write_moon_message(command.user_id, &command.message, command.correlation_id, clock)?;

    persist(&session, repo).await
}

/// Handles the `DeactivateSession` command (abandonment janitor).
///
/// # Errors
///
/// Returns `DomainError` if loading or appending fails.
pub async fn handle_deactivate_session(
    command: &DeactivateSession,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<SessionCommandResult, DomainError> {
    let mut session = load_session(command.game_id, repo).await?;

    session.set_inactive(command.correlation_id, clock);

    persist(&session, repo).await
}

/// Handles the `EndSession` command. Ending releases the players and the
/// turn, retains the log, and releases the originating Match record. A second
/// invocation observes the ended session and persists nothing.
///
/// A Match-registry failure is logged and left for out-of-band retry; the
/// already-persisted session state is not rolled back.
///
/// # Errors
///
/// Returns `DomainError` on validation or persistence failure.
pub async fn handle_end_session(
    command: &EndSession,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
    matches: &dyn MatchRegistry,
) -> Result<SessionCommandResult, DomainError> {
    let mut session = load_session(command.game_id, repo).await?;
    let match_id = session.match_id();

    let newly_ended =
        session.end_session(command.requested_by, command.correlation_id, clock)?;

    let result = persist(&session, repo).await?;

    if newly_ended {
        if let Some(match_id) = match_id {
            if let Err(error) = matches.release_match(match_id).await {
                tracing::warn!(%match_id, %error, "failed to release match record");
            }
        }
    }

    Ok(result)
}
