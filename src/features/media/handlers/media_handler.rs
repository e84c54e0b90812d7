use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::AppError;
use crate::core::extractor::AppJson;
use crate::features::media::dtos::{
    is_mime_type_allowed, MediaResponseDto, UpdateMediaDto, UploadMediaDto, ALLOWED_MIME_TYPES,
    MAX_FILE_SIZE,
};
use crate::features::media::services::MediaService;
use crate::features::users::models::AuthenticatedUser;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// Upload a media asset
///
/// Accepts multipart/form-data with:
/// - `file`: The image to upload (required)
/// - `alt`: Alternative text (optional)
#[utoipa::path(
    post,
    path = "/api/media",
    tag = "media",
    request_body(
        content = UploadMediaDto,
        content_type = "multipart/form-data",
        description = "Image upload form with optional alt text",
    ),
    responses(
        (status = 201, description = "Media uploaded successfully", body = ApiResponse<MediaResponseDto>),
        (status = 400, description = "Invalid file or validation error"),
        (status = 401, description = "Authentication required"),
        (status = 413, description = "File too large")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn upload_media(
    _user: AuthenticatedUser,
    State(service): State<Arc<MediaService>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<MediaResponseDto>>), AppError> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut file_name: Option<String> = None;
    let mut content_type: Option<String> = None;
    let mut alt: Option<String> = None;

    // Process multipart fields
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "file" => {
                let ct = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".to_string());

                let fname = field
                    .file_name()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "unnamed".to_string());

                let data = field.bytes().await.map_err(|e| {
                    debug!("Failed to read file bytes: {}", e);
                    AppError::BadRequest(format!("Failed to read file data: {}", e))
                })?;

                file_data = Some(data.to_vec());
                file_name = Some(fname);
                content_type = Some(ct);
            }
            "alt" => {
                let text = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read alt field: {}", e))
                })?;
                if !text.is_empty() {
                    alt = Some(text);
                }
            }
            _ => {
                // Ignore unknown fields
                debug!("Ignoring unknown field: {}", field_name);
            }
        }
    }

    // Validate required fields
    let file_data =
        file_data.ok_or_else(|| AppError::BadRequest("File is required".to_string()))?;
    let file_name =
        file_name.ok_or_else(|| AppError::BadRequest("Filename is required".to_string()))?;
    let content_type =
        content_type.ok_or_else(|| AppError::BadRequest("Content type is required".to_string()))?;

    // Validate file size
    if file_data.len() > MAX_FILE_SIZE {
        return Err(AppError::BadRequest(format!(
            "File too large. Maximum size is {} bytes ({} MB)",
            MAX_FILE_SIZE,
            MAX_FILE_SIZE / 1024 / 1024
        )));
    }

    // Validate MIME type
    if !is_mime_type_allowed(&content_type) {
        return Err(AppError::BadRequest(format!(
            "File type '{}' is not allowed. Allowed types: {}",
            content_type,
            ALLOWED_MIME_TYPES.join(", ")
        )));
    }

    let response = service
        .upload(file_data, &file_name, &content_type, alt)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(response), None, None)),
    ))
}

/// Get a media document
///
/// Publicly readable; returns the document with servable URLs derived
/// for the original and every generated size.
#[utoipa::path(
    get,
    path = "/api/media/{id}",
    tag = "media",
    params(
        ("id" = Uuid, Path, description = "Media id")
    ),
    responses(
        (status = 200, description = "Media document", body = ApiResponse<MediaResponseDto>),
        (status = 404, description = "Media not found")
    )
)]
pub async fn get_media(
    State(service): State<Arc<MediaService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MediaResponseDto>>, AppError> {
    let media = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(media), None, None)))
}

/// List media documents
#[utoipa::path(
    get,
    path = "/api/media",
    tag = "media",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Media documents", body = ApiResponse<Vec<MediaResponseDto>>)
    )
)]
pub async fn list_media(
    State(service): State<Arc<MediaService>>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<MediaResponseDto>>>, AppError> {
    let (media, total) = service.list(&pagination).await?;
    Ok(Json(ApiResponse::success(
        Some(media),
        None,
        Some(Meta { total }),
    )))
}

/// Update media metadata (alt text, caption, focal point)
#[utoipa::path(
    patch,
    path = "/api/media/{id}",
    tag = "media",
    params(
        ("id" = Uuid, Path, description = "Media id")
    ),
    request_body = UpdateMediaDto,
    responses(
        (status = 200, description = "Media updated", body = ApiResponse<MediaResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "Media not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_media(
    _user: AuthenticatedUser,
    State(service): State<Arc<MediaService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateMediaDto>,
) -> Result<Json<ApiResponse<MediaResponseDto>>, AppError> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let media = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(Some(media), None, None)))
}

/// Delete a media document and its stored files
#[utoipa::path(
    delete,
    path = "/api/media/{id}",
    tag = "media",
    params(
        ("id" = Uuid, Path, description = "Media id")
    ),
    responses(
        (status = 200, description = "Media deleted"),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "Media not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_media(
    _user: AuthenticatedUser,
    State(service): State<Arc<MediaService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Media deleted successfully".to_string()),
        None,
    )))
}
