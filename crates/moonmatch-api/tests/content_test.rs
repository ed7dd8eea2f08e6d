//! Integration tests for the content ingestion endpoints.

mod common;

use axum::http::StatusCode;

use moonmatch_content::ContentPack;
use moonmatch_content::pack::{ActivityDoc, CharacterDoc, QualityDoc};

fn sample_pack() -> serde_json::Value {
    let pack = ContentPack {
        qualities: vec![QualityDoc {
            name: "brave".to_owned(),
            words: vec!["sword".to_owned(), "torch".to_owned()],
        }],
        activities: vec![ActivityDoc {
            name: "stargazing".to_owned(),
            questions: vec!["What do you see in the sky?".to_owned()],
        }],
        character: Some(CharacterDoc {
            name: "Selene".to_owned(),
            avatar_url: "/avatars/selene.png".to_owned(),
            quality_1_choices: vec!["brave".to_owned()],
            activity_1_choices: vec!["stargazing".to_owned()],
            ..CharacterDoc::default()
        }),
        ..ContentPack::default()
    };
    serde_json::to_value(&pack).unwrap()
}

#[tokio::test]
async fn test_ingest_creates_entities_and_reports_counts() {
    let app = common::build_test_app();

    let (status, json) = common::post_json(&app.router, "/api/v1/content/ingest", &sample_pack()).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["qualities"], 1);
    assert_eq!(json["activities"], 1);
    assert_eq!(json["questions"], 1);
    assert_eq!(json["characters"], 1);
    assert_eq!(json["version_hash"].as_str().unwrap().len(), 64);
}

#[tokio::test]
async fn test_ingest_is_idempotent() {
    let app = common::build_test_app();
    common::post_json(&app.router, "/api/v1/content/ingest", &sample_pack()).await;

    let (status, json) = common::post_json(&app.router, "/api/v1/content/ingest", &sample_pack()).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["qualities"], 0);
    assert_eq!(json["activities"], 0);
    assert_eq!(json["questions"], 0);
    assert_eq!(json["characters"], 0);
}

#[tokio::test]
async fn test_character_listing_backs_avatar_selection() {
    let app = common::build_test_app();
    common::post_json(&app.router, "/api/v1/content/ingest", &sample_pack()).await;

    let (status, json) = common::get_json(&app.router, "/api/v1/content/characters").await;

    assert_eq!(status, StatusCode::OK);
    let characters = json.as_array().unwrap();
    assert_eq!(characters.len(), 1);
    assert_eq!(characters[0]["name"], "Selene");
    assert_eq!(characters[0]["avatar_url"], "/avatars/selene.png");
    assert!(characters[0]["id"].is_string());
}

#[tokio::test]
async fn test_ingest_rejects_unknown_slot_reference() {
    let app = common::build_test_app();
    let pack = ContentPack {
        character: Some(CharacterDoc {
            name: "Selene".to_owned(),
            quality_1_choices: vec!["nonexistent".to_owned()],
            ..CharacterDoc::default()
        }),
        ..ContentPack::default()
    };

    let (status, json) = common::post_json(
        &app.router,
        "/api/v1/content/ingest",
        &serde_json::to_value(&pack).unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "validation_error");
}
