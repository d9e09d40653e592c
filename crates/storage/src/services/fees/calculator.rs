use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::FeeError;
use crate::models::fee_schedule::format_amount;
use crate::models::{EventEntry, FeeSchedule, PerformanceType};

use super::sequence::{is_first_entry_for_dancer, solo_position};

pub const REGISTRATION_WAIVED: &str = "registration fee waived, already charged on an earlier entry";

/// Fee charged for one entry, split into its parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FeeBreakdown {
    pub performance_type: PerformanceType,
    /// Set for solos only
    pub solo_position: Option<u32>,
    pub participant_count: usize,
    pub performance_fee: Decimal,
    pub registration_fee: Decimal,
    pub total_fee: Decimal,
    pub explanation: String,
    /// Schedule fallbacks or clamps applied while pricing
    pub notes: Vec<String>,
}

/// Prices one entry from already-resolved facts about it.
///
/// Never fails: unconfigured or inconsistent price points produce a zero
/// component and a note instead.
pub fn compute_fee(
    performance_type: PerformanceType,
    solo_position: Option<u32>,
    participant_count: usize,
    schedule: &FeeSchedule,
    is_first_entry_for_dancer_in_event: bool,
) -> FeeBreakdown {
    let mut notes = Vec::new();

    let (performance_fee, performance_text, solo_position) = match performance_type {
        PerformanceType::Solo => {
            let position = solo_position.unwrap_or(1).max(1);
            let price = schedule.solo_increment(position);
            notes.extend(price.note);

            let detail = match position {
                1 => "first solo".to_string(),
                2 | 3 => format!(
                    "package total {}",
                    format_amount(schedule.solo_package_total(position))
                ),
                _ => "additional solo".to_string(),
            };

            (
                price.amount,
                format!(
                    "Solo entry #{}: {} ({})",
                    position,
                    format_amount(price.amount),
                    detail
                ),
                Some(position),
            )
        }
        _ => {
            let price = schedule.non_solo_fee(performance_type, participant_count);
            notes.extend(price.note);

            let rate = schedule
                .per_person_rate(performance_type, participant_count)
                .map(|r| format!(" ({} per person)", format_amount(r)))
                .unwrap_or_default();

            (
                price.amount,
                format!(
                    "{} with {} participants: {}{}",
                    performance_type,
                    participant_count,
                    format_amount(price.amount),
                    rate
                ),
                None,
            )
        }
    };

    let (registration_fee, registration_text) = if is_first_entry_for_dancer_in_event {
        let price = schedule.registration_fee();
        notes.extend(price.note);
        (
            price.amount,
            format!("registration fee {}", format_amount(price.amount)),
        )
    } else {
        (Decimal::ZERO, REGISTRATION_WAIVED.to_string())
    };

    FeeBreakdown {
        performance_type,
        solo_position,
        participant_count,
        performance_fee,
        registration_fee,
        total_fee: performance_fee + registration_fee,
        explanation: format!("{}; {}", performance_text, registration_text),
        notes,
    }
}

/// Prices `candidate` against the other entries known for its event.
///
/// `entries` can be the whole event: only entries submitted before the
/// candidate affect its solo position and registration fee.
pub fn quote_entry(
    candidate: &EventEntry,
    entries: &[EventEntry],
    schedule: &FeeSchedule,
) -> FeeBreakdown {
    let performance_type = candidate.performance_type();
    let position = candidate
        .is_solo()
        .then(|| solo_position(candidate, entries));
    let first_entry = is_first_entry_for_dancer(candidate, entries);

    let breakdown = compute_fee(
        performance_type,
        position,
        candidate.participant_count(),
        schedule,
        first_entry,
    );

    tracing::debug!(
        "Priced entry {} as {}: total {}",
        candidate.entry_id,
        performance_type,
        breakdown.total_fee
    );

    breakdown
}

/// Checks a client-declared performance type against the participant count.
pub fn resolve_performance_type(
    declared: Option<&str>,
    participant_count: usize,
) -> Result<PerformanceType, FeeError> {
    let derived = PerformanceType::from_participant_count(participant_count).ok_or_else(|| {
        FeeError::UnsupportedPerformanceType("entry without participants".to_string())
    })?;

    match declared {
        None => Ok(derived),
        Some(raw) => {
            let declared = raw
                .parse::<PerformanceType>()
                .map_err(FeeError::UnsupportedPerformanceType)?;

            if declared == derived {
                Ok(derived)
            } else {
                Err(FeeError::UnsupportedPerformanceType(format!(
                    "{} with {} participants",
                    declared, participant_count
                )))
            }
        }
    }
}
