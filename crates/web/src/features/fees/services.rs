use chrono::{NaiveDateTime, SubsecRound, Utc};
use sqlx::PgPool;
use storage::{
    dto::fees::{CandidateEntry, FeeQuoteRequest, FeeQuoteResponse, ReconciliationReport},
    error::Result,
    models::{Event, EventEntry, FeeSchedule},
    repository::{entry::EntryRepository, event::EventRepository},
    services::fees::{
        FeeBreakdown, PgEntryStore, calculator::resolve_performance_type,
        quote_entry, reconcile_event,
    },
};
use uuid::Uuid;

use crate::error::WebResult;

/// An event's current schedule and the entries already priced under it.
pub struct PricingContext {
    pub event: Event,
    pub schedule: FeeSchedule,
    pub history: Vec<EventEntry>,
}

/// Snapshot of the event and its entries, read once per request.
pub async fn load_pricing_context(pool: &PgPool, event_id: Uuid) -> Result<PricingContext> {
    let event = EventRepository::new(pool).find_by_id(event_id).await?;
    let rows = EntryRepository::new(pool).list_for_event(event_id).await?;

    let history = rows
        .into_iter()
        .filter_map(|row| match EventEntry::try_from(row) {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("Ignoring entry in fee history: {}", e);
                None
            }
        })
        .collect();

    Ok(PricingContext {
        schedule: FeeSchedule::from_event(&event),
        event,
        history,
    })
}

/// Timestamp truncated to what a Postgres TIMESTAMP column stores.
pub fn submission_time(requested: Option<NaiveDateTime>) -> NaiveDateTime {
    requested
        .unwrap_or_else(|| Utc::now().naive_utc())
        .trunc_subsecs(6)
}

/// Price a candidate entry against the event's live history.
pub fn price_candidate(
    context: &PricingContext,
    candidate: CandidateEntry<'_>,
    declared_type: Option<&str>,
    entry_id: Uuid,
    submitted_at: NaiveDateTime,
) -> WebResult<(EventEntry, FeeBreakdown)> {
    let entry = candidate.into_entry(entry_id, context.event.event_id, submitted_at)?;
    resolve_performance_type(declared_type, entry.participant_count())?;

    let breakdown = quote_entry(&entry, &context.history, &context.schedule);
    Ok((entry, breakdown))
}

pub async fn quote_fee(
    pool: &PgPool,
    event_id: Uuid,
    request: &FeeQuoteRequest,
) -> WebResult<FeeQuoteResponse> {
    let context = load_pricing_context(pool, event_id).await?;

    let (_, fee) = price_candidate(
        &context,
        request.candidate(),
        request.performance_type.as_deref(),
        Uuid::new_v4(),
        submission_time(request.submitted_at),
    )?;

    let response = FeeQuoteResponse::new(fee, &context.schedule, request.submitted_fee);

    if response.was_correct == Some(false) {
        tracing::info!(
            "Submitted fee {:?} for event {} differs from computed {}",
            response.submitted_fee,
            event_id,
            response.fee.total_fee
        );
    }

    Ok(response)
}

/// Recalculate every stored fee of an event
pub async fn recalculate_event_fees(pool: &PgPool, event_id: Uuid) -> Result<ReconciliationReport> {
    let store = PgEntryStore::new(pool);
    reconcile_event(&store, event_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use storage::models::PerformanceType;

    use crate::error::WebError;

    fn at(minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(9, minute, 0)
            .unwrap()
    }

    fn context(history: Vec<EventEntry>) -> PricingContext {
        let event = Event {
            event_id: Uuid::from_u128(7),
            name: "Regional Eisteddfod".to_string(),
            event_date: None,
            venue: None,
            registration_fee_per_dancer: Some(dec!(300)),
            solo_1_fee: Some(dec!(400)),
            solo_2_fee: Some(dec!(750)),
            solo_3_fee: Some(dec!(1000)),
            solo_additional_fee: Some(dec!(100)),
            duet_trio_fee_per_person: Some(dec!(280)),
            small_group_fee_per_person: Some(dec!(220)),
            large_group_fee_per_person: Some(dec!(190)),
            created_at: at(0),
            updated_at: at(0),
        };

        PricingContext {
            schedule: FeeSchedule::from_event(&event),
            event,
            history,
        }
    }

    fn quote_request(participants: &[&str], performance_type: Option<&str>) -> FeeQuoteRequest {
        FeeQuoteRequest {
            eodsa_id: Some("E1".to_string()),
            contestant_id: None,
            participant_ids: participants.iter().map(|p| p.to_string()).collect(),
            mastery: None,
            performance_type: performance_type.map(String::from),
            submitted_at: None,
            submitted_fee: None,
        }
    }

    #[test]
    fn test_price_candidate_counts_earlier_solos() {
        let request = quote_request(&["E1"], None);
        let (earlier, _) = price_candidate(
            &context(Vec::new()),
            request.candidate(),
            None,
            Uuid::from_u128(1),
            at(1),
        )
        .unwrap();

        let with_history = context(vec![earlier]);
        let (entry, fee) = price_candidate(
            &with_history,
            request.candidate(),
            Some("Solo"),
            Uuid::from_u128(2),
            at(2),
        )
        .unwrap();

        assert_eq!(entry.event_id, Uuid::from_u128(7));
        assert_eq!(fee.performance_type, PerformanceType::Solo);
        assert_eq!(fee.solo_position, Some(2));
        assert_eq!(fee.total_fee, dec!(350));
    }

    #[test]
    fn test_price_candidate_rejects_mismatched_type() {
        let request = quote_request(&["E1", "E2"], Some("Trio"));
        let result = price_candidate(
            &context(Vec::new()),
            request.candidate(),
            request.performance_type.as_deref(),
            Uuid::from_u128(1),
            at(1),
        );

        assert!(matches!(result, Err(WebError::Fee(_))));
    }

    #[test]
    fn test_submission_time_truncates_to_microseconds() {
        let requested = at(5) + chrono::Duration::nanoseconds(1_234_567);
        let stored = submission_time(Some(requested));
        assert_eq!(stored, at(5) + chrono::Duration::microseconds(1_234));
    }
}
