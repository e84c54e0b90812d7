use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::AppError;
use crate::core::extractor::AppJson;
use crate::features::tags::dtos::{CreateTagDto, TagResponseDto};
use crate::features::tags::services::TagService;
use crate::features::users::models::AuthenticatedUser;
use crate::shared::types::ApiResponse;

/// List tags
#[utoipa::path(
    get,
    path = "/api/tags",
    tag = "tags",
    responses(
        (status = 200, description = "Tags", body = ApiResponse<Vec<TagResponseDto>>)
    )
)]
pub async fn list_tags(
    State(service): State<Arc<TagService>>,
) -> Result<Json<ApiResponse<Vec<TagResponseDto>>>, AppError> {
    let tags = service.list().await?;
    Ok(Json(ApiResponse::success(Some(tags), None, None)))
}

/// Create a tag
#[utoipa::path(
    post,
    path = "/api/tags",
    tag = "tags",
    request_body = CreateTagDto,
    responses(
        (status = 201, description = "Tag created", body = ApiResponse<TagResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Authentication required"),
        (status = 409, description = "Slug already in use")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_tag(
    _user: AuthenticatedUser,
    State(service): State<Arc<TagService>>,
    AppJson(dto): AppJson<CreateTagDto>,
) -> Result<(StatusCode, Json<ApiResponse<TagResponseDto>>), AppError> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let tag = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(tag), None, None)),
    ))
}

/// Delete a tag
#[utoipa::path(
    delete,
    path = "/api/tags/{id}",
    tag = "tags",
    params(
        ("id" = Uuid, Path, description = "Tag id")
    ),
    responses(
        (status = 200, description = "Tag deleted"),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "Tag not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_tag(
    _user: AuthenticatedUser,
    State(service): State<Arc<TagService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Tag deleted successfully".to_string()),
        None,
    )))
}
