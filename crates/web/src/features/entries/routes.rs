use axum::{
    Router, middleware,
    routing::{get, post},
};
use storage::Database;

use super::handlers::{list_entries, submit_entry};
use crate::middleware::auth::{ApiKeys, require_auth};

pub fn routes(api_keys: ApiKeys) -> Router<Database> {
    let protected = Router::new()
        .route("/:event_id/entries", post(submit_entry))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new()
        .route("/:event_id/entries", get(list_entries))
        .merge(protected)
}
