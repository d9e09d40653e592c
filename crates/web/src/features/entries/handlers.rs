use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::{
        common::{PaginatedResponse, PaginationParams},
        fees::{CreateEntryRequest, CreateEntryResponse, EntryResponse},
    },
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/events/{event_id}/entries",
    params(
        ("event_id" = Uuid, Path, description = "Event ID"),
        PaginationParams
    ),
    responses(
        (status = 200, description = "Entries with their stored fees, oldest first", body = PaginatedResponse<EntryResponse>),
        (status = 400, description = "Invalid query parameters"),
        (status = 404, description = "Event not found")
    ),
    tag = "entries"
)]
pub async fn list_entries(
    State(db): State<Database>,
    Path(event_id): Path<Uuid>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Response, WebError> {
    pagination.validate().map_err(WebError::BadRequest)?;

    let (entries, total_items) = services::list_entries(db.pool(), event_id, &pagination).await?;

    let response = PaginatedResponse::new(
        entries,
        pagination.page,
        pagination.page_size,
        total_items,
    );

    Ok(Json(response).into_response())
}

#[utoipa::path(
    post,
    path = "/api/events/{event_id}/entries",
    params(
        ("event_id" = Uuid, Path, description = "Event ID")
    ),
    request_body = CreateEntryRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Entry stored with its computed fee", body = CreateEntryResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Event not found")
    ),
    tag = "entries"
)]
pub async fn submit_entry(
    State(db): State<Database>,
    Path(event_id): Path<Uuid>,
    Json(req): Json<CreateEntryRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let response = services::submit_entry(db.pool(), event_id, &req).await?;

    Ok((StatusCode::CREATED, Json(response)).into_response())
}
