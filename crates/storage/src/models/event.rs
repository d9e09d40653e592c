use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// A competition event and the raw fee columns it owns.
///
/// Every fee column is nullable: `NULL` means the organiser never configured
/// that price point. Use [`crate::models::FeeSchedule::from_event`] before
/// pricing anything.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Event {
    pub event_id: Uuid,
    pub name: String,
    pub event_date: Option<NaiveDate>,
    pub venue: Option<String>,

    pub registration_fee_per_dancer: Option<Decimal>,

    // Cumulative package totals for 1, 2 and 3 solos
    pub solo_1_fee: Option<Decimal>,
    pub solo_2_fee: Option<Decimal>,
    pub solo_3_fee: Option<Decimal>,
    pub solo_additional_fee: Option<Decimal>,

    pub duet_trio_fee_per_person: Option<Decimal>,
    pub small_group_fee_per_person: Option<Decimal>,
    pub large_group_fee_per_person: Option<Decimal>,

    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
