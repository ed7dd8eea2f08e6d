//! Integration tests for the game session endpoints: the full two-player
//! flow from match to moon phase to teardown, driven over HTTP against an
//! in-memory event store.

mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};
use uuid::Uuid;

use moonmatch_content::pack::{
    ActivityDoc, CharacterDoc, InterestDoc, NarrativeChoiceDoc, QualityDoc, SimpleWordDoc,
};
use moonmatch_content::{ContentPack, WordKind};

fn simple_word_stock() -> Vec<SimpleWordDoc> {
    let mut words = Vec::new();
    for kind in WordKind::SIMPLE {
        for i in 0..kind.simple_target() + 2 {
            words.push(SimpleWordDoc {
                text: format!("{kind:?}{i}").to_lowercase(),
                kind,
            });
        }
    }
    words
}

fn selene_pack() -> ContentPack {
    ContentPack {
        qualities: vec![
            QualityDoc {
                name: "brave".to_owned(),
                words: vec!["sword".to_owned(), "torch".to_owned(), "banner".to_owned()],
            },
            QualityDoc {
                name: "curious".to_owned(),
                words: vec!["riddle".to_owned(), "lens".to_owned(), "map".to_owned()],
            },
        ],
        activities: vec![
            ActivityDoc {
                name: "stargazing".to_owned(),
                questions: vec![
                    "What do you see in the sky?".to_owned(),
                    "Which star would you name?".to_owned(),
                    "Where does the night end?".to_owned(),
                ],
            },
            ActivityDoc {
                name: "night market".to_owned(),
                questions: vec![
                    "What would you trade?".to_owned(),
                    "Which stall calls to you?".to_owned(),
                    "What smells like home?".to_owned(),
                ],
            },
        ],
        interests: vec![InterestDoc {
            name: "astronomy".to_owned(),
            narrative_choices: vec![
                NarrativeChoiceDoc {
                    name: "watch the comet".to_owned(),
                    night_number: 1,
                    words: vec!["comet".to_owned()],
                },
                NarrativeChoiceDoc {
                    name: "map the stars".to_owned(),
                    night_number: 2,
                    words: vec!["atlas".to_owned()],
                },
                NarrativeChoiceDoc {
                    name: "name a crater".to_owned(),
                    night_number: 3,
                    words: vec!["crater".to_owned()],
                },
            ],
        }],
        simple_words: simple_word_stock(),
        character: Some(CharacterDoc {
            name: "Selene".to_owned(),
            avatar_url: "/avatars/selene.png".to_owned(),
            quality_1_choices: vec!["brave".to_owned()],
            quality_2_choices: vec!["curious".to_owned()],
            interest_1_choices: vec!["astronomy".to_owned()],
            activity_1_choices: vec!["stargazing".to_owned()],
            activity_2_choices: vec!["night market".to_owned()],
            ..CharacterDoc::default()
        }),
    }
}

fn orion_pack() -> ContentPack {
    ContentPack {
        character: Some(CharacterDoc {
            name: "Orion".to_owned(),
            avatar_url: "/avatars/orion.png".to_owned(),
            quality_1_choices: vec!["brave".to_owned()],
            quality_2_choices: vec!["curious".to_owned()],
            interest_1_choices: vec!["astronomy".to_owned()],
            activity_1_choices: vec!["stargazing".to_owned()],
            activity_2_choices: vec!["night market".to_owned()],
            ..CharacterDoc::default()
        }),
        ..ContentPack::default()
    }
}

async fn seeded_app() -> common::TestApp {
    let app = common::build_test_app();
    for pack in [selene_pack(), orion_pack()] {
        let (status, _) = common::post_json(
            &app.router,
            "/api/v1/content/ingest",
            &serde_json::to_value(&pack).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }
    app
}

async fn named_id(app: &common::TestApp, path: &str, name: &str) -> Uuid {
    let (status, json) = common::get_json(&app.router, path).await;
    assert_eq!(status, StatusCode::OK);
    let entry = json
        .as_array()
        .unwrap()
        .iter()
        .find(|e| e["name"] == name)
        .unwrap_or_else(|| panic!("{name} not found at {path}"));
    Uuid::parse_str(entry["id"].as_str().unwrap()).unwrap()
}

struct Game {
    game_id: Uuid,
    user_a: Uuid,
    user_b: Uuid,
    match_id: Uuid,
}

async fn create_session(app: &common::TestApp) -> Game {
    let user_a = Uuid::new_v4();
    let user_b = Uuid::new_v4();
    let match_id = Uuid::new_v4();
    let (status, json) = common::post_json(
        &app.router,
        "/api/v1/sessions",
        &json!({ "match_id": match_id, "player_a": user_a, "player_b": user_b }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    Game {
        game_id: Uuid::parse_str(json["game_id"].as_str().unwrap()).unwrap(),
        user_a,
        user_b,
        match_id,
    }
}

fn interpretation() -> Value {
    let phase = |meaning: &str| json!({ "meaning": meaning, "reason": "it feels right" });
    json!({
        "new_moon": phase("beginnings"),
        "first_quarter": phase("choices"),
        "full_moon": phase("clarity"),
        "last_quarter": phase("release"),
    })
}

async fn complete_creation(app: &common::TestApp, game: &Game, user: Uuid, character: &str) -> Value {
    let character_id = named_id(app, "/api/v1/content/characters", character).await;
    let base = format!("/api/v1/sessions/{}", game.game_id);

    let (status, _) = common::post_json(
        &app.router,
        &format!("{base}/character"),
        &json!({ "user_id": user, "character_id": character_id }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = common::post_json(
        &app.router,
        &format!("{base}/moon-meaning"),
        &json!({ "user_id": user, "interpretation": interpretation() }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let brave = named_id(app, "/api/v1/content/qualities", "brave").await;
    let curious = named_id(app, "/api/v1/content/qualities", "curious").await;
    let astronomy = named_id(app, "/api/v1/content/interests", "astronomy").await;
    let stargazing = named_id(app, "/api/v1/content/activities", "stargazing").await;
    let market = named_id(app, "/api/v1/content/activities", "night market").await;

    let (status, view) = common::post_json(
        &app.router,
        &format!("{base}/profile"),
        &json!({
            "user_id": user,
            "qualities": [brave, curious, null],
            "interests": [astronomy, null, null],
            "activities": [stargazing, market],
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    view
}

async fn session_in_regular_play(app: &common::TestApp) -> Game {
    let game = create_session(app).await;
    let mid_view = complete_creation(app, &game, game.user_a, "Selene").await;
    assert_eq!(mid_view["state"], "character_creation");
    let view = complete_creation(app, &game, game.user_b, "Orion").await;
    assert_eq!(view["state"], "regular_turn");
    game
}

async fn get_view(app: &common::TestApp, game: &Game) -> Value {
    let (status, view) =
        common::get_json(&app.router, &format!("/api/v1/sessions/{}", game.game_id)).await;
    assert_eq!(status, StatusCode::OK);
    view
}

fn active_user(view: &Value) -> Uuid {
    Uuid::parse_str(view["turn"]["active_user_id"].as_str().unwrap()).unwrap()
}

fn player<'a>(view: &'a Value, user: Uuid) -> &'a Value {
    view["players"]
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["user_id"] == user.to_string())
        .expect("player in view")
}

fn pick_unasked_question(view: &Value, user: Uuid) -> Uuid {
    let asked: Vec<&str> = view["asked_questions"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .collect();
    let id = player(view, user)["question_pool"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .find(|id| !asked.contains(id))
        .expect("an unasked question in the pool");
    Uuid::parse_str(id).unwrap()
}

fn first_pool_choice(view: &Value, user: Uuid) -> Uuid {
    let id = player(view, user)["narrative_choice_pool"]
        .as_array()
        .unwrap()
        .first()
        .and_then(Value::as_str)
        .expect("a narrative choice in the pool");
    Uuid::parse_str(id).unwrap()
}

/// One question/answer/reaction triple, acting as whoever is active.
async fn play_cycle(app: &common::TestApp, game: &Game) -> Value {
    let base = format!("/api/v1/sessions/{}", game.game_id);

    let view = get_view(app, game).await;
    let asker = active_user(&view);
    let question_id = pick_unasked_question(&view, asker);
    let (status, view) = common::post_json(
        &app.router,
        &format!("{base}/question"),
        &json!({ "user_id": asker, "question_id": question_id }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let answerer = active_user(&view);
    let (status, view) = common::post_json(
        &app.router,
        &format!("{base}/answer"),
        &json!({ "user_id": answerer, "answer": "the stars remember us" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let reactor = active_user(&view);
    let (status, view) = common::post_json(
        &app.router,
        &format!("{base}/reaction"),
        &json!({ "user_id": reactor, "emoji": "🌙" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    view
}

/// Two full cycles and both narrative choices: one complete night.
async fn play_night(app: &common::TestApp, game: &Game) -> Value {
    let base = format!("/api/v1/sessions/{}", game.game_id);

    play_cycle(app, game).await;
    let view = play_cycle(app, game).await;
    assert_eq!(view["turn"]["state"], "narrative_choices");

    let mut view = view;
    for user in [game.user_a, game.user_b] {
        let choice_id = first_pool_choice(&view, user);
        let (status, next) = common::post_json(
            &app.router,
            &format!("{base}/narrative-choice"),
            &json!({ "user_id": user, "choice_id": choice_id }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        view = next;
    }
    view
}

#[tokio::test]
async fn test_character_creation_fills_pools_and_starts_regular_play() {
    let app = seeded_app().await;
    let game = create_session(&app).await;

    complete_creation(&app, &game, game.user_a, "Selene").await;
    let view = complete_creation(&app, &game, game.user_b, "Orion").await;

    assert_eq!(view["state"], "regular_turn");
    assert_eq!(view["turn"]["number"], 1);
    assert_eq!(view["turn"]["state"], "select_question");
    assert_eq!(view["turn"]["active_user_id"], game.user_a.to_string());

    let selene = player(&view, game.user_a);
    assert_eq!(selene["creation_state"], "complete");
    assert_eq!(selene["display_name"], "Selene");
    // Two qualities of three words each; draws cap at the quality size.
    assert_eq!(selene["character_words"].as_array().unwrap().len(), 6);
    // Two activities granted three questions each.
    assert_eq!(selene["question_pool"].as_array().unwrap().len(), 6);
    // The interest pulls in all of its narrative choices.
    assert_eq!(selene["narrative_choice_pool"].as_array().unwrap().len(), 3);
    // Initial replenishment fills every simple kind to target.
    let expected_simple: usize = WordKind::SIMPLE.iter().map(|k| k.simple_target()).sum();
    assert_eq!(
        selene["simple_words"].as_array().unwrap().len(),
        expected_simple
    );
    assert_eq!(selene["moon_sign"]["full_moon"]["meaning"], "clarity");
}

#[tokio::test]
async fn test_wrong_player_action_is_rejected_without_mutation() {
    let app = seeded_app().await;
    let game = session_in_regular_play(&app).await;
    let view = get_view(&app, &game).await;
    assert_eq!(active_user(&view), game.user_a);
    let question_id = pick_unasked_question(&view, game.user_b);

    let (status, json) = common::post_json(
        &app.router,
        &format!("/api/v1/sessions/{}/question", game.game_id),
        &json!({ "user_id": game.user_b, "question_id": question_id }),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["error"], "not_your_turn");
    // Nothing moved: same phase, same active player, empty chat.
    let view = get_view(&app, &game).await;
    assert_eq!(view["turn"]["state"], "select_question");
    assert_eq!(active_user(&view), game.user_a);
    assert!(view["chat"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_answer_consumes_pool_words_and_reaction_attaches() {
    let app = seeded_app().await;
    let game = session_in_regular_play(&app).await;
    let base = format!("/api/v1/sessions/{}", game.game_id);

    let view = get_view(&app, &game).await;
    let question_id = pick_unasked_question(&view, game.user_a);
    let (_, view) = common::post_json(
        &app.router,
        &format!("{base}/question"),
        &json!({ "user_id": game.user_a, "question_id": question_id }),
    )
    .await;
    let simple_before = player(&view, game.user_b)["simple_words"]
        .as_array()
        .unwrap()
        .len();

    // "verb0" is a stocked simple word; "sword" is an earned quality word.
    let (status, view) = common::post_json(
        &app.router,
        &format!("{base}/answer"),
        &json!({ "user_id": game.user_b, "answer": "verb0 sword unknown" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let orion = player(&view, game.user_b);
    assert_eq!(
        orion["simple_words"].as_array().unwrap().len(),
        simple_before - 1
    );
    assert!(
        !orion["character_words"]
            .as_array()
            .unwrap()
            .iter()
            .any(|w| w["text"] == "sword")
    );

    let (status, view) = common::post_json(
        &app.router,
        &format!("{base}/reaction"),
        &json!({ "user_id": game.user_a, "emoji": "✨" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let chat = view["chat"].as_array().unwrap();
    assert_eq!(chat.len(), 2);
    assert_eq!(chat[1]["reaction"], "✨");
    assert_eq!(view["turn"]["state"], "select_question");
}

#[tokio::test]
async fn test_two_nights_reach_the_new_moon_checkpoint() {
    let app = seeded_app().await;
    let game = session_in_regular_play(&app).await;
    let base = format!("/api/v1/sessions/{}", game.game_id);

    // Night one: turn 2, no checkpoint.
    let view = play_night(&app, &game).await;
    assert_eq!(view["turn"]["number"], 2);
    assert_eq!(view["turn"]["night"], 1);
    assert_eq!(view["turn"]["state"], "select_question");

    // Night two: turn 3 is the new-moon checkpoint.
    let view = play_night(&app, &game).await;
    assert_eq!(view["turn"]["number"], 3);
    assert_eq!(view["turn"]["state"], "moon_phase");

    // Both players write; the phase completes and play resumes.
    let first_writer = active_user(&view);
    let (status, view) = common::post_json(
        &app.router,
        &format!("{base}/moon-message"),
        &json!({ "user_id": first_writer, "message": "a quiet beginning" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["turn"]["state"], "moon_phase");
    assert_eq!(
        player(&view, first_writer)["moon_sign"]["new_moon"]["meaning"],
        "a quiet beginning"
    );

    let second_writer = active_user(&view);
    assert_ne!(second_writer, first_writer);
    let (status, view) = common::post_json(
        &app.router,
        &format!("{base}/moon-message"),
        &json!({ "user_id": second_writer, "message": "an open door" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["turn"]["state"], "select_question");
    assert_eq!(view["turn"]["number"], 3);
    assert_eq!(
        player(&view, second_writer)["moon_sign"]["new_moon"]["meaning"],
        "an open door"
    );
}

#[tokio::test]
async fn test_end_session_is_idempotent_and_releases_match_once() {
    let app = seeded_app().await;
    let game = session_in_regular_play(&app).await;
    let base = format!("/api/v1/sessions/{}", game.game_id);

    let (status, view) = common::post_json(
        &app.router,
        &format!("{base}/end"),
        &json!({ "user_id": game.user_a }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["state"], "ended");
    assert_eq!(view["is_active"], false);
    assert!(view["players"].as_array().unwrap().is_empty());
    assert!(view["turn"].is_null());
    assert_eq!(app.matches.released(), vec![game.match_id]);

    // Second end: still ended, no duplicate release, chat retained.
    let (status, view) = common::post_json(&app.router, &format!("{base}/end"), &json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["state"], "ended");
    assert_eq!(app.matches.released().len(), 1);
}

#[tokio::test]
async fn test_unknown_session_returns_404() {
    let app = seeded_app().await;

    let (status, json) =
        common::get_json(&app.router, &format!("/api/v1/sessions/{}", Uuid::new_v4())).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "aggregate_not_found");
}
