//! Routes for the Game Session bounded context.
//!
//! Each endpoint is one player action: resolve the command, run its handler,
//! publish the room-scoped update, and return the refreshed session view for
//! rendering.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use moonmatch_core::command::Command;
use moonmatch_session::application::command_handlers::{
    handle_answer_question, handle_choose_character, handle_choose_moon_meaning,
    handle_create_public_profile, handle_deactivate_session, handle_end_session,
    handle_initialize_session, handle_make_narrative_choice, handle_react_with_emoji,
    handle_select_question, handle_write_moon_message,
};
use moonmatch_session::application::query_handlers::{GameSessionView, get_session_by_id};
use moonmatch_session::domain::commands::{
    AnswerQuestion, ChooseCharacter, ChooseMoonMeaning, CreatePublicProfile, DeactivateSession,
    EndSession, InitializeSession, MakeNarrativeChoice, ReactWithEmoji, SelectQuestion,
    WriteMoonMessage,
};
use moonmatch_session::domain::player::MoonSignInterpretation;

use crate::error::ApiError;
use crate::state::AppState;

/// Body of the "user matched" inbound event.
#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    /// The Match record that paired the users.
    pub match_id: Uuid,
    /// User for slot A.
    pub player_a: Option<Uuid>,
    /// User for slot B.
    pub player_b: Option<Uuid>,
}

/// Response to session creation.
#[derive(Debug, Serialize)]
pub struct SessionCreatedResponse {
    /// The new session's game id.
    pub game_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct ChooseCharacterRequest {
    /// The acting user.
    pub user_id: Uuid,
    /// The catalog character to play.
    pub character_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct ChooseMoonMeaningRequest {
    /// The acting user.
    pub user_id: Uuid,
    /// The four-phase interpretation document.
    pub interpretation: MoonSignInterpretation,
}

#[derive(Debug, Deserialize)]
pub struct CreateProfileRequest {
    /// The acting user.
    pub user_id: Uuid,
    /// Up to three chosen qualities; null slots are skipped.
    #[serde(default)]
    pub qualities: Vec<Option<Uuid>>,
    /// Up to three chosen interests; null slots are skipped.
    #[serde(default)]
    pub interests: Vec<Option<Uuid>>,
    /// Up to two chosen activities; null slots are skipped.
    #[serde(default)]
    pub activities: Vec<Option<Uuid>>,
}

#[derive(Debug, Deserialize)]
pub struct SelectQuestionRequest {
    /// The acting user.
    pub user_id: Uuid,
    /// The question to ask.
    pub question_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    /// The acting user.
    pub user_id: Uuid,
    /// The free-text answer.
    pub answer: String,
}

#[derive(Debug, Deserialize)]
pub struct ReactionRequest {
    /// The acting user.
    pub user_id: Uuid,
    /// The emoji reaction.
    pub emoji: String,
}

#[derive(Debug, Deserialize)]
pub struct NarrativeChoiceRequest {
    /// The acting user.
    pub user_id: Uuid,
    /// The narrative choice to take.
    pub choice_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct MoonMessageRequest {
    /// The acting user.
    pub user_id: Uuid,
    /// The free-text moon message.
    pub message: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct EndSessionRequest {
    /// The requesting user; omitted for system-initiated teardown.
    #[serde(default)]
    pub user_id: Option<Uuid>,
}

async fn view(state: &AppState, game_id: Uuid) -> Result<Json<GameSessionView>, ApiError> {
    Ok(Json(get_session_by_id(game_id, state.events.as_ref()).await?))
}

/// POST / — a fresh Match spawns a session.
async fn create_session(
    State(state): State<AppState>,
    Json(body): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<SessionCreatedResponse>), ApiError> {
    let command = InitializeSession {
        correlation_id: Uuid::new_v4(),
        match_id: body.match_id,
        player_a: body.player_a,
        player_b: body.player_b,
    };
    let result =
        handle_initialize_session(&command, state.clock.as_ref(), state.events.as_ref()).await?;

    state.updates.publish(result.aggregate_id, command.command_type());
    Ok((
        StatusCode::CREATED,
        Json(SessionCreatedResponse {
            game_id: result.aggregate_id,
        }),
    ))
}

/// GET /{game_id} — the current session view.
async fn get_session(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
) -> Result<Json<GameSessionView>, ApiError> {
    view(&state, game_id).await
}

/// POST /{game_id}/character
async fn choose_character(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
    Json(body): Json<ChooseCharacterRequest>,
) -> Result<Json<GameSessionView>, ApiError> {
    let command = ChooseCharacter {
        correlation_id: Uuid::new_v4(),
        game_id,
        user_id: body.user_id,
        character_id: body.character_id,
    };
    {
        let catalog = state.catalog.read().await;
        handle_choose_character(&command, state.clock.as_ref(), &catalog, state.events.as_ref())
            .await?;
    }

    state.updates.publish(game_id, command.command_type());
    view(&state, game_id).await
}

/// POST /{game_id}/moon-meaning
async fn choose_moon_meaning(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
    Json(body): Json<ChooseMoonMeaningRequest>,
) -> Result<Json<GameSessionView>, ApiError> {
    let command = ChooseMoonMeaning {
        correlation_id: Uuid::new_v4(),
        game_id,
        user_id: body.user_id,
        interpretation: body.interpretation,
    };
    handle_choose_moon_meaning(&command, state.clock.as_ref(), state.events.as_ref()).await?;

    state.updates.publish(game_id, command.command_type());
    view(&state, game_id).await
}

/// POST /{game_id}/profile
async fn create_public_profile(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
    Json(body): Json<CreateProfileRequest>,
) -> Result<Json<GameSessionView>, ApiError> {
    let command = CreatePublicProfile {
        correlation_id: Uuid::new_v4(),
        game_id,
        user_id: body.user_id,
        qualities: body.qualities,
        interests: body.interests,
        activities: body.activities,
    };
    {
        let catalog = state.catalog.read().await;
        let mut rng = state.rng.lock().await;
        handle_create_public_profile(
            &command,
            state.clock.as_ref(),
            &mut *rng,
            &catalog,
            state.events.as_ref(),
        )
        .await?;
    }

    state.updates.publish(game_id, command.command_type());
    view(&state, game_id).await
}

/// POST /{game_id}/question
async fn select_question(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
    Json(body): Json<SelectQuestionRequest>,
) -> Result<Json<GameSessionView>, ApiError> {
    let command = SelectQuestion {
        correlation_id: Uuid::new_v4(),
        game_id,
        user_id: body.user_id,
        question_id: body.question_id,
    };
    {
        let catalog = state.catalog.read().await;
        handle_select_question(&command, state.clock.as_ref(), &catalog, state.events.as_ref())
            .await?;
    }

    state.updates.publish(game_id, command.command_type());
    view(&state, game_id).await
}

/// POST /{game_id}/answer
async fn answer_question(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
    Json(body): Json<AnswerRequest>,
) -> Result<Json<GameSessionView>, ApiError> {
    let command = AnswerQuestion {
        correlation_id: Uuid::new_v4(),
        game_id,
        user_id: body.user_id,
        answer: body.answer,
    };
    handle_answer_question(&command, state.clock.as_ref(), state.events.as_ref()).await?;

    state.updates.publish(game_id, command.command_type());
    view(&state, game_id).await
}

/// POST /{game_id}/reaction
async fn react_with_emoji(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
    Json(body): Json<ReactionRequest>,
) -> Result<Json<GameSessionView>, ApiError> {
    let command = ReactWithEmoji {
        correlation_id: Uuid::new_v4(),
        game_id,
        user_id: body.user_id,
        emoji: body.emoji,
    };
    handle_react_with_emoji(&command, state.clock.as_ref(), state.events.as_ref()).await?;

    state.updates.publish(game_id, command.command_type());
    view(&state, game_id).await
}

/// POST /{game_id}/narrative-choice
async fn make_narrative_choice(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
    Json(body): Json<NarrativeChoiceRequest>,
) -> Result<Json<GameSessionView>, ApiError> {
    let command = MakeNarrativeChoice {
        correlation_id: Uuid::new_v4(),
        game_id,
        user_id: body.user_id,
        choice_id: body.choice_id,
    };
    {
        let catalog = state.catalog.read().await;
        let mut rng = state.rng.lock().await;
        handle_make_narrative_choice(
            &command,
            state.clock.as_ref(),
            &mut *rng,
            &catalog,
            state.events.as_ref(),
        )
        .await?;
    }

    state.updates.publish(game_id, command.command_type());
    view(&state, game_id).await
}

/// POST /{game_id}/moon-message
async fn write_moon_message(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
    Json(body): Json<MoonMessageRequest>,
) -> Result<Json<GameSessionView>, ApiError> {
    let command = WriteMoonMessage {
        correlation_id: Uuid::new_v4(),
        game_id,
        user_id: body.user_id,
        message: body.message,
    };
    handle_write_moon_message(&command, state.clock.as_ref(), state.events.as_ref()).await?;

    state.updates.publish(game_id, command.command_type());
    view(&state, game_id).await
}

/// POST /{game_id}/deactivate — the abandonment janitor's entry point.
async fn deactivate_session(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
) -> Result<Json<GameSessionView>, ApiError> {
    let command = DeactivateSession {
        correlation_id: Uuid::new_v4(),
        game_id,
    };
    handle_deactivate_session(&command, state.clock.as_ref(), state.events.as_ref()).await?;

    state.updates.publish(game_id, command.command_type());
    view(&state, game_id).await
}

/// POST /{game_id}/end
async fn end_session(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
    body: Option<Json<EndSessionRequest>>,
) -> Result<Json<GameSessionView>, ApiError> {
    let body = body.map(|Json(b)| b).unwrap_or_default();
    let command = EndSession {
        correlation_id: Uuid::new_v4(),
        game_id,
        requested_by: body.user_id,
    };
    handle_end_session(
        &command,
        state.clock.as_ref(),
        state.events.as_ref(),
        state.matches.as_ref(),
    )
    .await?;

    state.updates.publish(game_id, command.command_type());
    view(&state, game_id).await
}

/// Returns the router for the session context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_session))
        .route("/{game_id}", get(get_session))
        .route("/{game_id}/character", post(choose_character))
        .route("/{game_id}/moon-meaning", post(choose_moon_meaning))
        .route("/{game_id}/profile", post(create_public_profile))
        .route("/{game_id}/question", post(select_question))
        .route("/{game_id}/answer", post(answer_question))
        .route("/{game_id}/reaction", post(react_with_emoji))
        .route("/{game_id}/narrative-choice", post(make_narrative_choice))
        .route("/{game_id}/moon-message", post(write_moon_message))
        .route("/{game_id}/deactivate", post(deactivate_session))
        .route("/{game_id}/end", post(end_session))
}
