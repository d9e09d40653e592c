use sqlx::PgPool;
use storage::{
    dto::fees::{FeeScheduleResponse, UpdateFeeScheduleRequest},
    error::Result,
    models::FeeSchedule,
    repository::event::EventRepository,
};
use uuid::Uuid;

/// Get the resolved fee schedule of an event
pub async fn get_fee_schedule(pool: &PgPool, event_id: Uuid) -> Result<FeeScheduleResponse> {
    let repo = EventRepository::new(pool);
    let event = repo.find_by_id(event_id).await?;

    let schedule = FeeSchedule::from_event(&event);
    Ok(FeeScheduleResponse::new(event.event_id, event.name, schedule))
}

/// Replace the fee schedule of an event.
///
/// Stored entry fees are left untouched until a recalculation is run.
pub async fn update_fee_schedule(
    pool: &PgPool,
    event_id: Uuid,
    request: &UpdateFeeScheduleRequest,
) -> Result<FeeScheduleResponse> {
    let repo = EventRepository::new(pool);
    let event = repo.update_fee_schedule(event_id, request).await?;

    tracing::info!("Fee schedule updated for event {} ({})", event.name, event_id);

    let schedule = FeeSchedule::from_event(&event);
    Ok(FeeScheduleResponse::new(event.event_id, event.name, schedule))
}
