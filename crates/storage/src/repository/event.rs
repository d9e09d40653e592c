use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::fees::UpdateFeeScheduleRequest;
use crate::error::{Result, StorageError};
use crate::models::Event;

const EVENT_COLUMNS: &str = r#"
    event_id, name, event_date, venue,
    registration_fee_per_dancer,
    solo_1_fee, solo_2_fee, solo_3_fee, solo_additional_fee,
    duet_trio_fee_per_person, small_group_fee_per_person, large_group_fee_per_person,
    created_at, updated_at
"#;

/// Repository for Event database operations
pub struct EventRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> EventRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_optional(&self, event_id: Uuid) -> Result<Option<Event>> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {} FROM events WHERE event_id = $1",
            EVENT_COLUMNS
        ))
        .bind(event_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(event)
    }

    pub async fn find_by_id(&self, event_id: Uuid) -> Result<Event> {
        self.find_optional(event_id)
            .await?
            .ok_or(StorageError::NotFound)
    }

    /// Replace the fee columns of an event. Omitted fields are cleared.
    pub async fn update_fee_schedule(
        &self,
        event_id: Uuid,
        req: &UpdateFeeScheduleRequest,
    ) -> Result<Event> {
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            UPDATE events
            SET
                registration_fee_per_dancer = $2,
                solo_1_fee = $3,
                solo_2_fee = $4,
                solo_3_fee = $5,
                solo_additional_fee = $6,
                duet_trio_fee_per_person = $7,
                small_group_fee_per_person = $8,
                large_group_fee_per_person = $9,
                updated_at = CURRENT_TIMESTAMP
            WHERE event_id = $1
            RETURNING {}
            "#,
            EVENT_COLUMNS
        ))
        .bind(event_id)
        .bind(req.registration_fee_per_dancer)
        .bind(req.solo_1_fee)
        .bind(req.solo_2_fee)
        .bind(req.solo_3_fee)
        .bind(req.solo_additional_fee)
        .bind(req.duet_trio_fee_per_person)
        .bind(req.small_group_fee_per_person)
        .bind(req.large_group_fee_per_person)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(event)
    }
}
