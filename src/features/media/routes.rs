use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::features::media::dtos::MAX_FILE_SIZE;
use crate::features::media::handlers::{
    delete_media, get_media, list_media, update_media, upload_media,
};
use crate::features::media::services::MediaService;

/// Routes open to anyone: the media library is publicly readable
pub fn public_routes(service: Arc<MediaService>) -> Router {
    Router::new()
        .route("/api/media", get(list_media))
        .route("/api/media/{id}", get(get_media))
        .with_state(service)
}

/// Routes requiring an authenticated user: create, update, delete
pub fn protected_routes(service: Arc<MediaService>) -> Router {
    Router::new()
        .route(
            "/api/media",
            // Allow body size up to MAX_FILE_SIZE + buffer for multipart overhead
            post(upload_media).layer(DefaultBodyLimit::max(MAX_FILE_SIZE + 1024 * 1024)),
        )
        .route(
            "/api/media/{id}",
            axum::routing::patch(update_media).delete(delete_media),
        )
        .with_state(service)
}
