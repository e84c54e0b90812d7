use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use crate::features::categories::handlers;
use crate::features::categories::services::CategoryService;

pub fn public_routes(service: Arc<CategoryService>) -> Router {
    Router::new()
        .route("/api/categories", get(handlers::list_categories))
        .route("/api/categories/{slug}", get(handlers::get_category))
        .with_state(service)
}

pub fn protected_routes(service: Arc<CategoryService>) -> Router {
    Router::new()
        .route("/api/categories", post(handlers::create_category))
        .route("/api/categories/{slug}", delete(handlers::delete_category))
        .with_state(service)
}
