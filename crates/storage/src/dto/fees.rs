use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::error::FeeError;
use crate::models::entry::parse_participant_ids;
use crate::models::{DEFAULT_MASTERY, EventEntry, EventEntryRow, FeeSchedule, PerformanceType};
use crate::services::fees::{FEE_EPSILON, FeeBreakdown};

/// Request payload for replacing an event's fee schedule.
/// Omitted fields become "not configured".
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateFeeScheduleRequest {
    #[validate(custom(function = "validate_non_negative"))]
    pub registration_fee_per_dancer: Option<Decimal>,

    #[validate(custom(function = "validate_non_negative"))]
    pub solo_1_fee: Option<Decimal>,

    #[validate(custom(function = "validate_non_negative"))]
    pub solo_2_fee: Option<Decimal>,

    #[validate(custom(function = "validate_non_negative"))]
    pub solo_3_fee: Option<Decimal>,

    #[validate(custom(function = "validate_non_negative"))]
    pub solo_additional_fee: Option<Decimal>,

    #[validate(custom(function = "validate_non_negative"))]
    pub duet_trio_fee_per_person: Option<Decimal>,

    #[validate(custom(function = "validate_non_negative"))]
    pub small_group_fee_per_person: Option<Decimal>,

    #[validate(custom(function = "validate_non_negative"))]
    pub large_group_fee_per_person: Option<Decimal>,
}

fn validate_non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        let mut error = ValidationError::new("non_negative");
        error.message = Some("Fee must not be negative".into());
        return Err(error);
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SoloTier {
    pub position: u32,
    pub incremental_fee: Decimal,
    pub package_total: Decimal,
}

/// An event's resolved schedule, with the solo increments it implies.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FeeScheduleResponse {
    pub event_id: Uuid,
    pub event_name: String,
    pub schedule: FeeSchedule,
    pub solo_tiers: Vec<SoloTier>,
}

impl FeeScheduleResponse {
    pub fn new(event_id: Uuid, event_name: String, schedule: FeeSchedule) -> Self {
        let solo_tiers = (1..=4)
            .map(|position| SoloTier {
                position,
                incremental_fee: schedule.solo_increment(position).amount,
                package_total: schedule.solo_package_total(position),
            })
            .collect();

        Self {
            event_id,
            event_name,
            schedule,
            solo_tiers,
        }
    }
}

/// Request payload for submitting a new entry.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateEntryRequest {
    #[validate(length(max = 64))]
    pub eodsa_id: Option<String>,

    #[validate(length(max = 64))]
    pub contestant_id: Option<String>,

    #[validate(length(min = 1, message = "At least one participant is required"))]
    pub participant_ids: Vec<String>,

    #[validate(length(max = 128))]
    pub mastery: Option<String>,

    #[validate(length(
        min = 1,
        max = 255,
        message = "Item name must be between 1 and 255 characters"
    ))]
    pub item_name: String,

    /// Optional check against the participant count
    pub performance_type: Option<String>,

    /// Backdated submissions for data corrections; defaults to now
    pub submitted_at: Option<NaiveDateTime>,
}

/// Request payload for pricing an entry without storing it.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct FeeQuoteRequest {
    #[validate(length(max = 64))]
    pub eodsa_id: Option<String>,

    #[validate(length(max = 64))]
    pub contestant_id: Option<String>,

    #[validate(length(min = 1, message = "At least one participant is required"))]
    pub participant_ids: Vec<String>,

    #[validate(length(max = 128))]
    pub mastery: Option<String>,

    pub performance_type: Option<String>,

    pub submitted_at: Option<NaiveDateTime>,

    /// Fee the client intends to charge; compared against the computed total
    pub submitted_fee: Option<Decimal>,
}

/// Builds an unsaved entry to price against an event's history.
pub struct CandidateEntry<'a> {
    pub eodsa_id: &'a Option<String>,
    pub contestant_id: &'a Option<String>,
    pub participant_ids: &'a [String],
    pub mastery: &'a Option<String>,
    pub item_name: &'a str,
}

impl CandidateEntry<'_> {
    pub fn into_entry(
        self,
        entry_id: Uuid,
        event_id: Uuid,
        submitted_at: NaiveDateTime,
    ) -> Result<EventEntry, FeeError> {
        let raw: Value = self
            .participant_ids
            .iter()
            .cloned()
            .map(Value::String)
            .collect();
        let participant_ids = parse_participant_ids(entry_id, &raw)?;

        let mastery = self
            .mastery
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_MASTERY)
            .to_string();

        Ok(EventEntry {
            entry_id,
            event_id,
            eodsa_id: trimmed(self.eodsa_id),
            contestant_id: trimmed(self.contestant_id),
            participant_ids,
            mastery,
            item_name: self.item_name.trim().to_string(),
            calculated_fee: Decimal::ZERO,
            submitted_at,
        })
    }
}

fn trimmed(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

impl CreateEntryRequest {
    pub fn candidate(&self) -> CandidateEntry<'_> {
        CandidateEntry {
            eodsa_id: &self.eodsa_id,
            contestant_id: &self.contestant_id,
            participant_ids: &self.participant_ids,
            mastery: &self.mastery,
            item_name: &self.item_name,
        }
    }
}

impl FeeQuoteRequest {
    pub fn candidate(&self) -> CandidateEntry<'_> {
        CandidateEntry {
            eodsa_id: &self.eodsa_id,
            contestant_id: &self.contestant_id,
            participant_ids: &self.participant_ids,
            mastery: &self.mastery,
            item_name: "Fee quote",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FeeQuoteResponse {
    pub fee: FeeBreakdown,
    /// Total the dancer will have paid for solos, including this one
    pub solo_package_total: Option<Decimal>,
    pub submitted_fee: Option<Decimal>,
    pub was_correct: Option<bool>,
}

impl FeeQuoteResponse {
    /// Adds the solo package total and checks `submitted_fee` against the
    /// computed total, within one cent.
    pub fn new(fee: FeeBreakdown, schedule: &FeeSchedule, submitted_fee: Option<Decimal>) -> Self {
        let solo_package_total = fee
            .solo_position
            .map(|position| schedule.solo_package_total(position));
        let was_correct =
            submitted_fee.map(|submitted| (submitted - fee.total_fee).abs() <= FEE_EPSILON);

        Self {
            fee,
            solo_package_total,
            submitted_fee,
            was_correct,
        }
    }
}

/// An entry as stored, without re-validating its participant list.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EntryResponse {
    pub entry_id: Uuid,
    pub event_id: Uuid,
    pub eodsa_id: Option<String>,
    pub contestant_id: Option<String>,
    #[schema(value_type = Object)]
    pub participant_ids: Value,
    pub mastery: String,
    pub item_name: String,
    pub calculated_fee: Decimal,
    pub submitted_at: NaiveDateTime,
}

impl From<EventEntryRow> for EntryResponse {
    fn from(row: EventEntryRow) -> Self {
        Self {
            entry_id: row.entry_id,
            event_id: row.event_id,
            eodsa_id: row.eodsa_id,
            contestant_id: row.contestant_id,
            participant_ids: row.participant_ids.0,
            mastery: row.mastery,
            item_name: row.item_name,
            calculated_fee: row.calculated_fee,
            submitted_at: row.submitted_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateEntryResponse {
    pub entry: EntryResponse,
    pub fee: FeeBreakdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReconciliationStatus {
    Updated,
    Unchanged,
    Error,
}

/// Outcome of recalculating one entry.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EntryReconciliation {
    pub entry_id: Uuid,
    pub item_name: String,
    pub status: ReconciliationStatus,
    pub old_fee: Decimal,
    pub new_fee: Option<Decimal>,
    /// `new_fee - old_fee`, set when the fee changed
    pub difference: Option<Decimal>,
    pub performance_type: Option<PerformanceType>,
    pub solo_position: Option<u32>,
    pub performance_fee: Option<Decimal>,
    pub registration_fee: Option<Decimal>,
    pub mastery: Option<String>,
    pub explanation: Option<String>,
    pub error: Option<String>,
}

/// Summary of a fee recalculation run over one event.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReconciliationReport {
    pub event_id: Uuid,
    pub event_name: Option<String>,
    pub message: String,
    pub total_entries: usize,
    pub updated_count: usize,
    pub unchanged_count: usize,
    pub error_count: usize,
    /// Configuration problems found on the event's schedule
    pub schedule_warnings: Vec<String>,
    pub results: Vec<EntryReconciliation>,
}

impl ReconciliationReport {
    pub fn nothing_to_do(event_id: Uuid, event_name: Option<String>, message: String) -> Self {
        Self {
            event_id,
            event_name,
            message,
            total_entries: 0,
            updated_count: 0,
            unchanged_count: 0,
            error_count: 0,
            schedule_warnings: Vec::new(),
            results: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fees::calculator::compute_fee;
    use rust_decimal_macros::dec;

    fn epoch() -> NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_negative_fee_fails_validation() {
        let req = UpdateFeeScheduleRequest {
            solo_2_fee: Some(Decimal::new(-100, 0)),
            ..Default::default()
        };
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("solo_2_fee"));
    }

    #[test]
    fn test_zero_and_absent_fees_are_valid() {
        let req = UpdateFeeScheduleRequest {
            registration_fee_per_dancer: Some(Decimal::ZERO),
            solo_1_fee: Some(Decimal::new(400, 0)),
            ..Default::default()
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_candidate_defaults_mastery_and_trims_ids() {
        let req = FeeQuoteRequest {
            eodsa_id: Some(" E7 ".to_string()),
            contestant_id: Some(String::new()),
            participant_ids: vec!["E7".to_string()],
            mastery: None,
            performance_type: None,
            submitted_at: None,
            submitted_fee: None,
        };

        let entry = req
            .candidate()
            .into_entry(Uuid::nil(), Uuid::nil(), epoch())
            .unwrap();

        assert_eq!(entry.eodsa_id.as_deref(), Some("E7"));
        assert_eq!(entry.contestant_id, None);
        assert_eq!(entry.mastery, DEFAULT_MASTERY);
    }

    fn schedule() -> FeeSchedule {
        FeeSchedule {
            registration_fee_per_dancer: Some(dec!(300)),
            solo_1_fee: Some(dec!(400)),
            solo_2_fee: Some(dec!(750)),
            solo_3_fee: Some(dec!(1000)),
            solo_additional_fee: Some(dec!(100)),
            duet_trio_fee_per_person: Some(dec!(280)),
            small_group_fee_per_person: Some(dec!(220)),
            large_group_fee_per_person: Some(dec!(190)),
            warnings: Vec::new(),
        }
    }

    fn solo_quote(position: u32, first_entry: bool) -> FeeBreakdown {
        compute_fee(
            PerformanceType::Solo,
            Some(position),
            1,
            &schedule(),
            first_entry,
        )
    }

    #[test]
    fn test_quote_response_accepts_exact_fee() {
        let response = FeeQuoteResponse::new(solo_quote(1, true), &schedule(), Some(dec!(700)));
        assert_eq!(response.was_correct, Some(true));
        assert_eq!(response.submitted_fee, Some(dec!(700)));
    }

    #[test]
    fn test_quote_response_tolerates_one_cent() {
        let response = FeeQuoteResponse::new(solo_quote(2, false), &schedule(), Some(dec!(349.99)));
        assert_eq!(response.was_correct, Some(true));

        let response = FeeQuoteResponse::new(solo_quote(2, false), &schedule(), Some(dec!(350.01)));
        assert_eq!(response.was_correct, Some(true));
    }

    #[test]
    fn test_quote_response_flags_wrong_fee() {
        let response = FeeQuoteResponse::new(solo_quote(2, false), &schedule(), Some(dec!(400)));
        assert_eq!(response.was_correct, Some(false));
    }

    #[test]
    fn test_quote_response_without_submitted_fee() {
        let response = FeeQuoteResponse::new(solo_quote(1, true), &schedule(), None);
        assert_eq!(response.was_correct, None);
        assert_eq!(response.submitted_fee, None);
    }

    #[test]
    fn test_quote_response_package_total() {
        let third = FeeQuoteResponse::new(solo_quote(3, false), &schedule(), None);
        assert_eq!(third.fee.performance_fee, dec!(250));
        assert_eq!(third.solo_package_total, Some(dec!(1000)));

        let duet = compute_fee(PerformanceType::Duet, None, 2, &schedule(), false);
        let duet = FeeQuoteResponse::new(duet, &schedule(), None);
        assert_eq!(duet.solo_package_total, None);
    }

    #[test]
    fn test_candidate_rejects_duplicate_participants() {
        let participants = vec!["d-1".to_string(), "d-1".to_string()];
        let candidate = CandidateEntry {
            eodsa_id: &None,
            contestant_id: &None,
            participant_ids: &participants,
            mastery: &None,
            item_name: "Duet",
        };

        assert!(
            candidate
                .into_entry(Uuid::nil(), Uuid::nil(), epoch())
                .is_err()
        );
    }
}
