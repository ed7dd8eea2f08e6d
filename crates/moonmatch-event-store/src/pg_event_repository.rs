//! `PostgreSQL` implementation of the `EventRepository` trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use moonmatch_core::error::DomainError;
use moonmatch_core::repository::{EventRepository, StoredEvent};

/// PostgreSQL-backed event repository.
#[derive(Debug, Clone)]
pub struct PgEventRepository {
    pool: PgPool,
}

impl PgEventRepository {
    /// Creates a new `PgEventRepository`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn infrastructure(error: sqlx::Error) -> DomainError {
    DomainError::Infrastructure(error.to_string())
}

#[async_trait]
impl EventRepository for PgEventRepository {
    async fn load_events(&self, aggregate_id: Uuid) -> Result<Vec<StoredEvent>, DomainError> {
        let rows = sqlx::query(
            "SELECT event_id, aggregate_id, event_type, payload, sequence_number, \
                    correlation_id, causation_id, occurred_at \
             FROM domain_events \
             WHERE aggregate_id = $1 \
             ORDER BY sequence_number",
        )
        .bind(aggregate_id)
        .fetch_all(&self.pool)
        .await
        .map_err(infrastructure)?;

        rows.into_iter()
            .map(|row| {
                Ok(StoredEvent {
                    event_id: row.try_get::<Uuid, _>("event_id").map_err(infrastructure)?,
                    aggregate_id: row
                        .try_get::<Uuid, _>("aggregate_id")
                        .map_err(infrastructure)?,
                    event_type: row
                        .try_get::<String, _>("event_type")
                        .map_err(infrastructure)?,
                    payload: row
                        .try_get::<serde_json::Value, _>("payload")
                        .map_err(infrastructure)?,
                    sequence_number: row
                        .try_get::<i64, _>("sequence_number")
                        .map_err(infrastructure)?,
                    correlation_id: row
                        .try_get::<Uuid, _>("correlation_id")
                        .map_err(infrastructure)?,
                    causation_id: row
                        .try_get::<Uuid, _>("causation_id")
                        .map_err(infrastructure)?,
                    occurred_at: row
                        .try_get::<DateTime<Utc>, _>("occurred_at")
                        .map_err(infrastructure)?,
                })
            })
            .collect()
    }

    async fn append_events(
        &self,
        aggregate_id: Uuid,
        expected_version: i64,
        events: &[StoredEvent],
    ) -> Result<(), DomainError> {
        if events.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await.map_err(infrastructure)?;

        // Lock the stream tail so concurrent appenders serialize here. A
        // brand-new stream has no row to lock; the unique constraint on
        // (aggregate_id, sequence_number) settles that race below.
        let actual: Option<i64> = sqlx::query_scalar(
            "SELECT sequence_number FROM domain_events \
             WHERE aggregate_id = $1 \
             ORDER BY sequence_number DESC \
             LIMIT 1 \
             FOR UPDATE",
        )
        .bind(aggregate_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(infrastructure)?;
        let actual = actual.unwrap_or(0);

        if actual != expected_version {
            return Err(DomainError::ConcurrencyConflict {
                aggregate_id,
                expected: expected_version,
                actual,
            });
        }

        for event in events {
            sqlx::query(
                "INSERT INTO domain_events \
                     (event_id, aggregate_id, event_type, payload, sequence_number, \
                      correlation_id, causation_id, occurred_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
            )
            .bind(event.event_id)
            .bind(event.aggregate_id)
            .bind(&event.event_type)
            .bind(&event.payload)
            .bind(event.sequence_number)
            .bind(event.correlation_id)
            .bind(event.causation_id)
            .bind(event.occurred_at)
            .execute(&mut *tx)
            .await
            .map_err(|error| {
                if let sqlx::Error::Database(db_error) = &error {
                    if db_error.is_unique_violation() {
                        return DomainError::ConcurrencyConflict {
                            aggregate_id,
                            expected: expected_version,
                            actual: event.sequence_number,
                        };
                    }
                }
                infrastructure(error)
            })?;
        }

        tx.commit().await.map_err(infrastructure)?;
        Ok(())
    }
}
