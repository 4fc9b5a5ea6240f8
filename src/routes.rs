use axum::Router;
use std::sync::Arc;

use crate::{SharedData, api, logging};

/// Assembles the complete application router: the todo API, the swagger UI,
/// and the request tracing layer.
pub fn build_router(shared_data: Arc<SharedData>) -> Router {
    let app = Router::new()
        .merge(api::todo::todo_routes())
        .merge(api::swagger_main::build_documentation())
        .with_state(shared_data);

    logging::attach_tracing_http(app)
}
