//! Integration tests for `PgEventRepository`.
//!
//! These tests need a reachable PostgreSQL instance; they skip themselves
//! when `DATABASE_URL` is unset or the connection fails, so the suite stays
//! green on machines without a database.

use chrono::Utc;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use moonmatch_core::error::DomainError;
use moonmatch_core::repository::{EventRepository, StoredEvent};
use moonmatch_event_store::pg_event_repository::PgEventRepository;
use moonmatch_event_store::schema;

async fn test_pool() -> Option<PgPool> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("skipping: DATABASE_URL is not set");
        return None;
    };
    let pool = match PgPoolOptions::new().max_connections(2).connect(&url).await {
        Ok(pool) => pool,
        Err(error) => {
            eprintln!("skipping: could not connect to {url}: {error}");
            return None;
        }
    };
    if let Err(error) = sqlx::raw_sql(schema::CREATE_EVENTS_TABLE).execute(&pool).await {
        eprintln!("skipping: could not create schema: {error}");
        return None;
    }
    Some(pool)
}

/// Helper to build a `StoredEvent` with sensible defaults.
fn make_stored_event(aggregate_id: Uuid, sequence_number: i64) -> StoredEvent {
    StoredEvent {
        event_id: Uuid::new_v4(),
        aggregate_id,
        event_type: "TestEvent".to_string(),
        payload: serde_json::json!({"key": "value"}),
        sequence_number,
        correlation_id: Uuid::new_v4(),
        causation_id: Uuid::new_v4(),
        occurred_at: Utc::now(),
    }
}

#[tokio::test]
async fn test_load_events_returns_empty_vec_for_nonexistent_aggregate() {
    let Some(pool) = test_pool().await else { return };
    let repo = PgEventRepository::new(pool);
    let aggregate_id = Uuid::new_v4();

    let events = repo.load_events(aggregate_id).await.unwrap();

    assert!(events.is_empty());
}

#[tokio::test]
async fn test_append_and_load_single_event() {
    let Some(pool) = test_pool().await else { return };
    let repo = PgEventRepository::new(pool);
    let aggregate_id = Uuid::new_v4();
    let event = make_stored_event(aggregate_id, 1);
    let expected_event_id = event.event_id;
    let expected_payload = event.payload.clone();

    repo.append_events(aggregate_id, 0, &[event]).await.unwrap();

    let loaded = repo.load_events(aggregate_id).await.unwrap();
    assert_eq!(loaded.len(), 1);

    let e = &loaded[0];
    assert_eq!(e.event_id, expected_event_id);
    assert_eq!(e.aggregate_id, aggregate_id);
    assert_eq!(e.event_type, "TestEvent");
    assert_eq!(e.payload, expected_payload);
    assert_eq!(e.sequence_number, 1);
}

#[tokio::test]
async fn test_append_multiple_events_preserves_sequence_order() {
    let Some(pool) = test_pool().await else { return };
    let repo = PgEventRepository::new(pool);
    let aggregate_id = Uuid::new_v4();
    let events = vec![
        make_stored_event(aggregate_id, 1),
        make_stored_event(aggregate_id, 2),
        make_stored_event(aggregate_id, 3),
    ];

    repo.append_events(aggregate_id, 0, &events).await.unwrap();

    let loaded = repo.load_events(aggregate_id).await.unwrap();
    assert_eq!(loaded.len(), 3);
    assert_eq!(loaded[0].sequence_number, 1);
    assert_eq!(loaded[1].sequence_number, 2);
    assert_eq!(loaded[2].sequence_number, 3);
}

#[tokio::test]
async fn test_aggregate_isolation() {
    let Some(pool) = test_pool().await else { return };
    let repo = PgEventRepository::new(pool);
    let agg_a = Uuid::new_v4();
    let agg_b = Uuid::new_v4();

    repo.append_events(agg_a, 0, &[make_stored_event(agg_a, 1)])
        .await
        .unwrap();
    repo.append_events(agg_b, 0, &[make_stored_event(agg_b, 1)])
        .await
        .unwrap();

    let loaded_a = repo.load_events(agg_a).await.unwrap();
    let loaded_b = repo.load_events(agg_b).await.unwrap();

    assert_eq!(loaded_a.len(), 1);
    assert_eq!(loaded_b.len(), 1);
    assert_eq!(loaded_a[0].aggregate_id, agg_a);
    assert_eq!(loaded_b[0].aggregate_id, agg_b);
}

#[tokio::test]
async fn test_stale_expected_version_is_rejected() {
    let Some(pool) = test_pool().await else { return };
    let repo = PgEventRepository::new(pool);
    let aggregate_id = Uuid::new_v4();

    repo.append_events(
        aggregate_id,
        0,
        &[
            make_stored_event(aggregate_id, 1),
            make_stored_event(aggregate_id, 2),
        ],
    )
    .await
    .unwrap();

    // A racer that loaded before the first append tries to write with a
    // stale expected version.
    let result = repo
        .append_events(
            aggregate_id,
            0,
            &[
                make_stored_event(aggregate_id, 3),
                make_stored_event(aggregate_id, 4),
            ],
        )
        .await;

    match result {
        Err(DomainError::ConcurrencyConflict {
            aggregate_id: conflict_agg_id,
            expected,
            actual,
        }) => {
            assert_eq!(conflict_agg_id, aggregate_id);
            assert_eq!(expected, 0);
            assert_eq!(actual, 2);
        }
        other => panic!("expected ConcurrencyConflict, got {other:?}"),
    }
}

#[tokio::test]
async fn test_sequential_appends_with_correct_expected_version() {
    let Some(pool) = test_pool().await else { return };
    let repo = PgEventRepository::new(pool);
    let aggregate_id = Uuid::new_v4();

    repo.append_events(
        aggregate_id,
        0,
        &[
            make_stored_event(aggregate_id, 1),
            make_stored_event(aggregate_id, 2),
        ],
    )
    .await
    .unwrap();

    repo.append_events(
        aggregate_id,
        2,
        &[
            make_stored_event(aggregate_id, 3),
            make_stored_event(aggregate_id, 4),
        ],
    )
    .await
    .unwrap();

    let loaded = repo.load_events(aggregate_id).await.unwrap();
    assert_eq!(loaded.len(), 4);
    for (i, event) in loaded.iter().enumerate() {
        assert_eq!(event.sequence_number, i64::try_from(i + 1).unwrap());
    }
}

#[tokio::test]
async fn test_append_empty_events_is_noop() {
    let Some(pool) = test_pool().await else { return };
    let repo = PgEventRepository::new(pool);
    let aggregate_id = Uuid::new_v4();

    repo.append_events(aggregate_id, 0, &[]).await.unwrap();

    let loaded = repo.load_events(aggregate_id).await.unwrap();
    assert!(loaded.is_empty());
}

#[tokio::test]
async fn test_complex_json_payload_round_trip() {
    let Some(pool) = test_pool().await else { return };
    let repo = PgEventRepository::new(pool);
    let aggregate_id = Uuid::new_v4();
    let complex_payload = serde_json::json!({
        "nested": {"key": "value", "number": 42},
        "array": [1, "two", null, true, false],
        "null_field": null,
        "empty_object": {},
        "empty_array": []
    });

    let mut event = make_stored_event(aggregate_id, 1);
    event.payload = complex_payload.clone();

    repo.append_events(aggregate_id, 0, &[event]).await.unwrap();

    let loaded = repo.load_events(aggregate_id).await.unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].payload, complex_payload);
}
