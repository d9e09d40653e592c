use sqlx::PgPool;
use storage::{
    dto::{
        common::PaginationParams,
        fees::{CreateEntryRequest, CreateEntryResponse, EntryResponse},
    },
    error::Result,
    repository::{
        entry::{EntryRepository, NewEntry},
        event::EventRepository,
    },
};
use uuid::Uuid;

use crate::error::WebResult;
use crate::features::fees::services::{load_pricing_context, price_candidate, submission_time};

/// List an event's entries in submission order
pub async fn list_entries(
    pool: &PgPool,
    event_id: Uuid,
    pagination: &PaginationParams,
) -> Result<(Vec<EntryResponse>, i64)> {
    // 404 for unknown events rather than an empty page
    EventRepository::new(pool).find_by_id(event_id).await?;

    let repo = EntryRepository::new(pool);
    let (rows, total_items) = repo.list_for_event_paginated(event_id, pagination).await?;

    Ok((rows.into_iter().map(EntryResponse::from).collect(), total_items))
}

/// Price a new entry against the entries that exist now, then store it.
pub async fn submit_entry(
    pool: &PgPool,
    event_id: Uuid,
    request: &CreateEntryRequest,
) -> WebResult<CreateEntryResponse> {
    let context = load_pricing_context(pool, event_id).await?;

    let (entry, fee) = price_candidate(
        &context,
        request.candidate(),
        request.performance_type.as_deref(),
        Uuid::new_v4(),
        submission_time(request.submitted_at),
    )?;

    let new_entry = NewEntry {
        entry_id: entry.entry_id,
        event_id,
        eodsa_id: entry.eodsa_id,
        contestant_id: entry.contestant_id,
        participant_ids: entry.participant_ids,
        mastery: entry.mastery,
        item_name: entry.item_name,
        calculated_fee: fee.total_fee.round_dp(2),
        submitted_at: entry.submitted_at,
    };

    let row = EntryRepository::new(pool).create(&new_entry).await?;

    tracing::info!(
        "Entry {} submitted for event {} with fee {}",
        row.entry_id,
        event_id,
        row.calculated_fee
    );

    Ok(CreateEntryResponse {
        entry: EntryResponse::from(row),
        fee,
    })
}
