use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde_json::Value;
use sqlx::{PgPool, types::Json};
use uuid::Uuid;

use crate::dto::common::PaginationParams;
use crate::error::{Result, StorageError};
use crate::models::EventEntryRow;

const ENTRY_COLUMNS: &str = r#"
    entry_id, event_id, eodsa_id, contestant_id, participant_ids,
    mastery, item_name, calculated_fee, submitted_at
"#;

/// Fields of an entry about to be inserted, with its fee already computed.
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub entry_id: Uuid,
    pub event_id: Uuid,
    pub eodsa_id: Option<String>,
    pub contestant_id: Option<String>,
    pub participant_ids: Vec<String>,
    pub mastery: String,
    pub item_name: String,
    pub calculated_fee: Decimal,
    pub submitted_at: NaiveDateTime,
}

/// Repository for event entry database operations
pub struct EntryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> EntryRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All entries of an event in submission order.
    pub async fn list_for_event(&self, event_id: Uuid) -> Result<Vec<EventEntryRow>> {
        let rows = sqlx::query_as::<_, EventEntryRow>(&format!(
            r#"
            SELECT {}
            FROM event_entries
            WHERE event_id = $1
            ORDER BY submitted_at ASC, entry_id ASC
            "#,
            ENTRY_COLUMNS
        ))
        .bind(event_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn list_for_event_paginated(
        &self,
        event_id: Uuid,
        pagination: &PaginationParams,
    ) -> Result<(Vec<EventEntryRow>, i64)> {
        let total_items: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM event_entries WHERE event_id = $1")
                .bind(event_id)
                .fetch_one(self.pool)
                .await?;

        let rows = sqlx::query_as::<_, EventEntryRow>(&format!(
            r#"
            SELECT {}
            FROM event_entries
            WHERE event_id = $1
            ORDER BY submitted_at ASC, entry_id ASC
            LIMIT $2 OFFSET $3
            "#,
            ENTRY_COLUMNS
        ))
        .bind(event_id)
        .bind(pagination.limit() as i64)
        .bind(pagination.offset() as i64)
        .fetch_all(self.pool)
        .await?;

        Ok((rows, total_items))
    }

    pub async fn create(&self, entry: &NewEntry) -> Result<EventEntryRow> {
        let participants: Value = entry
            .participant_ids
            .iter()
            .cloned()
            .map(Value::String)
            .collect();

        let row = sqlx::query_as::<_, EventEntryRow>(&format!(
            r#"
            INSERT INTO event_entries (
                entry_id, event_id, eodsa_id, contestant_id, participant_ids,
                mastery, item_name, calculated_fee, submitted_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            ENTRY_COLUMNS
        ))
        .bind(entry.entry_id)
        .bind(entry.event_id)
        .bind(&entry.eodsa_id)
        .bind(&entry.contestant_id)
        .bind(Json(participants))
        .bind(&entry.mastery)
        .bind(&entry.item_name)
        .bind(entry.calculated_fee)
        .bind(entry.submitted_at)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            let error = StorageError::from(e);
            if error.is_foreign_key_violation() {
                // Unknown event
                StorageError::NotFound
            } else if error.is_unique_violation() {
                StorageError::ConstraintViolation("Entry already exists".to_string())
            } else {
                error
            }
        })?;

        Ok(row)
    }

    /// Single-statement write so readers never see a half-updated fee.
    pub async fn update_calculated_fee(&self, entry_id: Uuid, fee: Decimal) -> Result<()> {
        let result = sqlx::query("UPDATE event_entries SET calculated_fee = $1 WHERE entry_id = $2")
            .bind(fee)
            .bind(entry_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}
