use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use crate::features::tags::handlers;
use crate::features::tags::services::TagService;

pub fn public_routes(service: Arc<TagService>) -> Router {
    Router::new()
        .route("/api/tags", get(handlers::list_tags))
        .with_state(service)
}

pub fn protected_routes(service: Arc<TagService>) -> Router {
    Router::new()
        .route("/api/tags", post(handlers::create_tag))
        .route("/api/tags/{id}", delete(handlers::delete_tag))
        .with_state(service)
}
