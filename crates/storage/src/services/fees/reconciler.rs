use rust_decimal::Decimal;
use uuid::Uuid;

use crate::dto::fees::{EntryReconciliation, ReconciliationReport, ReconciliationStatus};
use crate::error::{FeeError, Result};
use crate::models::{EventEntry, EventEntryRow, FeeSchedule};

use super::calculator::{FeeBreakdown, quote_entry};
use super::sequence::submission_key;
use super::store::EntryStore;

/// Stored and recomputed fees closer than this are considered equal.
pub const FEE_EPSILON: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// A recomputed fee for one entry, before anything is written.
#[derive(Debug, Clone)]
pub struct PlannedFee {
    pub entry: EventEntry,
    pub breakdown: FeeBreakdown,
}

impl PlannedFee {
    pub fn new_fee(&self) -> Decimal {
        self.breakdown.total_fee.round_dp(2)
    }

    pub fn needs_update(&self) -> bool {
        (self.new_fee() - self.entry.calculated_fee).abs() > FEE_EPSILON
    }
}

/// Entry that could not be priced, with what is known about it.
#[derive(Debug, Clone)]
pub struct FailedEntry {
    pub entry_id: Uuid,
    pub item_name: String,
    pub old_fee: Decimal,
    pub error: FeeError,
}

#[derive(Debug, Clone)]
pub enum PlanItem {
    Priced(PlannedFee),
    Failed(FailedEntry),
}

/// Recomputes every entry's fee against `schedule`, in submission order.
///
/// Pure: the result depends only on the rows and the schedule, never on the
/// order the rows arrive in. Rows whose participants cannot be parsed are
/// reported as failures and take no part in pricing the others.
pub fn plan_fees(schedule: &FeeSchedule, mut rows: Vec<EventEntryRow>) -> Vec<PlanItem> {
    rows.sort_by_key(|row| submission_key(row.submitted_at, row.entry_id));

    let mut processed: Vec<EventEntry> = Vec::with_capacity(rows.len());
    let mut plan = Vec::with_capacity(rows.len());

    for row in rows {
        let entry_id = row.entry_id;
        let item_name = row.item_name.clone();
        let old_fee = row.calculated_fee;

        match EventEntry::try_from(row) {
            Ok(entry) => {
                // Only earlier entries are in `processed`
                let breakdown = quote_entry(&entry, &processed, schedule);
                processed.push(entry.clone());
                plan.push(PlanItem::Priced(PlannedFee { entry, breakdown }));
            }
            Err(error) => plan.push(PlanItem::Failed(FailedEntry {
                entry_id,
                item_name,
                old_fee,
                error,
            })),
        }
    }

    plan
}

/// Recalculates and persists the fees of every entry of an event.
///
/// Each changed fee is written on its own; a failed entry, or a failed
/// write, is counted and reported without stopping the run. A missing event
/// or an event without entries is reported as nothing to do.
pub async fn reconcile_event<S>(store: &S, event_id: Uuid) -> Result<ReconciliationReport>
where
    S: EntryStore + ?Sized,
{
    let Some(event) = store.load_event(event_id).await? else {
        tracing::warn!("Fee recalculation requested for unknown event {}", event_id);
        return Ok(ReconciliationReport::nothing_to_do(
            event_id,
            None,
            "Event not found; nothing to recalculate".to_string(),
        ));
    };

    let rows = store.load_entries(event_id).await?;
    if rows.is_empty() {
        tracing::info!("Event {} has no entries to recalculate", event_id);
        return Ok(ReconciliationReport::nothing_to_do(
            event_id,
            Some(event.name),
            "No entries found for this event".to_string(),
        ));
    }

    let schedule = FeeSchedule::from_event(&event);
    let total_entries = rows.len();

    tracing::info!(
        "Recalculating fees for {} entries of event {} ({})",
        total_entries,
        event.name,
        event_id
    );

    let mut results = Vec::with_capacity(total_entries);
    let (mut updated_count, mut unchanged_count, mut error_count) = (0, 0, 0);

    for item in plan_fees(&schedule, rows) {
        match item {
            PlanItem::Failed(failed) => {
                tracing::warn!(
                    "Could not recalculate fee for entry {}: {}",
                    failed.entry_id,
                    failed.error
                );
                error_count += 1;
                results.push(EntryReconciliation {
                    entry_id: failed.entry_id,
                    item_name: failed.item_name,
                    status: ReconciliationStatus::Error,
                    old_fee: failed.old_fee,
                    new_fee: None,
                    difference: None,
                    performance_type: None,
                    solo_position: None,
                    performance_fee: None,
                    registration_fee: None,
                    mastery: None,
                    explanation: None,
                    error: Some(failed.error.to_string()),
                });
            }
            PlanItem::Priced(planned) => {
                let new_fee = planned.new_fee();
                let old_fee = planned.entry.calculated_fee;

                let (status, error) = if !planned.needs_update() {
                    unchanged_count += 1;
                    (ReconciliationStatus::Unchanged, None)
                } else {
                    match store
                        .update_calculated_fee(planned.entry.entry_id, new_fee)
                        .await
                    {
                        Ok(()) => {
                            tracing::info!(
                                "Entry {} fee updated: {} -> {}",
                                planned.entry.entry_id,
                                old_fee,
                                new_fee
                            );
                            updated_count += 1;
                            (ReconciliationStatus::Updated, None)
                        }
                        Err(e) => {
                            tracing::warn!(
                                "Failed to store recalculated fee for entry {}: {}",
                                planned.entry.entry_id,
                                e
                            );
                            error_count += 1;
                            (ReconciliationStatus::Error, Some(e.to_string()))
                        }
                    }
                };

                let difference = (status == ReconciliationStatus::Updated)
                    .then(|| new_fee - old_fee);

                results.push(EntryReconciliation {
                    entry_id: planned.entry.entry_id,
                    item_name: planned.entry.item_name,
                    status,
                    old_fee,
                    new_fee: Some(new_fee),
                    difference,
                    performance_type: Some(planned.breakdown.performance_type),
                    solo_position: planned.breakdown.solo_position,
                    performance_fee: Some(planned.breakdown.performance_fee),
                    registration_fee: Some(planned.breakdown.registration_fee),
                    mastery: Some(planned.entry.mastery),
                    explanation: Some(planned.breakdown.explanation),
                    error,
                });
            }
        }
    }

    tracing::info!(
        "Fee recalculation for event {} finished: {} updated, {} unchanged, {} errors",
        event_id,
        updated_count,
        unchanged_count,
        error_count
    );

    Ok(ReconciliationReport {
        event_id,
        event_name: Some(event.name),
        message: format!("Recalculated fees for {} entries", total_entries),
        total_entries,
        updated_count,
        unchanged_count,
        error_count,
        schedule_warnings: schedule.warnings,
        results,
    })
}
