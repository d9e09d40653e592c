use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::fees::{FeeScheduleResponse, UpdateFeeScheduleRequest},
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/events/{event_id}/fee-schedule",
    params(
        ("event_id" = Uuid, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Resolved fee schedule with solo increments", body = FeeScheduleResponse),
        (status = 404, description = "Event not found")
    ),
    tag = "events"
)]
pub async fn get_fee_schedule(
    State(db): State<Database>,
    Path(event_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let schedule = services::get_fee_schedule(db.pool(), event_id).await?;

    Ok(Json(schedule).into_response())
}

#[utoipa::path(
    put,
    path = "/api/events/{event_id}/fee-schedule",
    params(
        ("event_id" = Uuid, Path, description = "Event ID")
    ),
    request_body = UpdateFeeScheduleRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Fee schedule updated", body = FeeScheduleResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Event not found")
    ),
    tag = "events"
)]
pub async fn update_fee_schedule(
    State(db): State<Database>,
    Path(event_id): Path<Uuid>,
    Json(req): Json<UpdateFeeScheduleRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let schedule = services::update_fee_schedule(db.pool(), event_id, &req).await?;

    Ok(Json(schedule).into_response())
}
