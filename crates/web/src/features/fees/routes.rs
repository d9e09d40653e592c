use axum::{Router, middleware, routing::post};
use storage::Database;

use super::handlers::{quote_fee, recalculate_fees};
use crate::middleware::auth::{ApiKeys, require_auth};

pub fn routes() -> Router<Database> {
    Router::new().route("/:event_id/fee-quote", post(quote_fee))
}

pub fn admin_routes(api_keys: ApiKeys) -> Router<Database> {
    Router::new()
        .route("/:event_id/recalculate-fees", post(recalculate_fees))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth))
}
