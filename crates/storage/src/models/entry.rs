use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{FromRow, types::Json};
use std::collections::HashSet;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::FeeError;
use crate::models::PerformanceType;

/// Division used when an entry was stored without one.
pub const DEFAULT_MASTERY: &str = "Water (Competitive)";

/// An `event_entries` row exactly as stored.
///
/// `participant_ids` is kept as raw JSON because legacy rows are not
/// guaranteed to hold a well-formed list of dancer ids.
#[derive(Debug, Clone, FromRow)]
pub struct EventEntryRow {
    pub entry_id: Uuid,
    pub event_id: Uuid,
    pub eodsa_id: Option<String>,
    pub contestant_id: Option<String>,
    pub participant_ids: Json<Value>,
    pub mastery: String,
    pub item_name: String,
    pub calculated_fee: Decimal,
    pub submitted_at: NaiveDateTime,
}

/// A validated entry, safe to price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EventEntry {
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

impl EventEntry {
    pub fn participant_count(&self) -> usize {
        self.participant_ids.len()
    }

    pub fn is_solo(&self) -> bool {
        self.participant_ids.len() == 1
    }

    pub fn performance_type(&self) -> PerformanceType {
        // Validation guarantees at least one participant
        PerformanceType::from_participant_count(self.participant_ids.len())
            .unwrap_or(PerformanceType::Solo)
    }
}

impl TryFrom<EventEntryRow> for EventEntry {
    type Error = FeeError;

    fn try_from(row: EventEntryRow) -> Result<Self, Self::Error> {
        let participant_ids = parse_participant_ids(row.entry_id, &row.participant_ids.0)?;

        let mastery = if row.mastery.trim().is_empty() {
            DEFAULT_MASTERY.to_string()
        } else {
            row.mastery
        };

        Ok(Self {
            entry_id: row.entry_id,
            event_id: row.event_id,
            eodsa_id: non_blank(row.eodsa_id),
            contestant_id: non_blank(row.contestant_id),
            participant_ids,
            mastery,
            item_name: row.item_name,
            calculated_fee: row.calculated_fee,
            submitted_at: row.submitted_at,
        })
    }
}

/// Parses the stored participant JSON into a non-empty list of distinct ids.
pub fn parse_participant_ids(entry_id: Uuid, value: &Value) -> Result<Vec<String>, FeeError> {
    let malformed = |reason: String| FeeError::MalformedParticipants { entry_id, reason };

    let items = value
        .as_array()
        .ok_or_else(|| malformed(format!("expected a JSON array, found {}", value)))?;

    if items.is_empty() {
        return Err(malformed("no participants listed".to_string()));
    }

    let mut seen = HashSet::with_capacity(items.len());
    let mut ids = Vec::with_capacity(items.len());

    for item in items {
        let id = match item {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            other => return Err(malformed(format!("invalid participant id {}", other))),
        };

        if id.is_empty() {
            return Err(malformed("blank participant id".to_string()));
        }
        if !seen.insert(id.clone()) {
            return Err(malformed(format!("participant {} listed twice", id)));
        }

        ids.push(id);
    }

    Ok(ids)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
