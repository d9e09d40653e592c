use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::fees::{FeeQuoteRequest, FeeQuoteResponse, ReconciliationReport},
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    post,
    path = "/api/events/{event_id}/fee-quote",
    params(
        ("event_id" = Uuid, Path, description = "Event ID")
    ),
    request_body = FeeQuoteRequest,
    responses(
        (status = 200, description = "Fee computed against the event's current entries", body = FeeQuoteResponse),
        (status = 400, description = "Invalid participants or performance type"),
        (status = 404, description = "Event not found")
    ),
    tag = "fees"
)]
pub async fn quote_fee(
    State(db): State<Database>,
    Path(event_id): Path<Uuid>,
    Json(payload): Json<FeeQuoteRequest>,
) -> Result<Response, WebError> {
    payload.validate()?;

    let response = services::quote_fee(db.pool(), event_id, &payload).await?;

    Ok(Json(response).into_response())
}

#[utoipa::path(
    post,
    path = "/api/admin/events/{event_id}/recalculate-fees",
    params(
        ("event_id" = Uuid, Path, description = "Event ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Fees recalculated; per-entry outcomes included", body = ReconciliationReport),
        (status = 401, description = "Unauthorized")
    ),
    tag = "fees"
)]
pub async fn recalculate_fees(
    State(db): State<Database>,
    Path(event_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let report = services::recalculate_event_fees(db.pool(), event_id).await?;

    Ok(Json(report).into_response())
}
