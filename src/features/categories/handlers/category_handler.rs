use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use validator::Validate;

use crate::core::error::AppError;
use crate::core::extractor::AppJson;
use crate::features::categories::dtos::{CategoryResponseDto, CreateCategoryDto};
use crate::features::categories::services::CategoryService;
use crate::features::users::models::AuthenticatedUser;
use crate::shared::types::ApiResponse;

/// List categories
#[utoipa::path(
    get,
    path = "/api/categories",
    tag = "categories",
    responses(
        (status = 200, description = "Categories", body = ApiResponse<Vec<CategoryResponseDto>>)
    )
)]
pub async fn list_categories(
    State(service): State<Arc<CategoryService>>,
) -> Result<Json<ApiResponse<Vec<CategoryResponseDto>>>, AppError> {
    let categories = service.list().await?;
    Ok(Json(ApiResponse::success(Some(categories), None, None)))
}

/// Get a category by slug
#[utoipa::path(
    get,
    path = "/api/categories/{slug}",
    tag = "categories",
    params(
        ("slug" = String, Path, description = "Category slug")
    ),
    responses(
        (status = 200, description = "Category", body = ApiResponse<CategoryResponseDto>),
        (status = 404, description = "Category not found")
    )
)]
pub async fn get_category(
    State(service): State<Arc<CategoryService>>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<CategoryResponseDto>>, AppError> {
    let category = service.get_by_slug(&slug).await?;
    Ok(Json(ApiResponse::success(Some(category), None, None)))
}

/// Create a category
#[utoipa::path(
    post,
    path = "/api/categories",
    tag = "categories",
    request_body = CreateCategoryDto,
    responses(
        (status = 201, description = "Category created", body = ApiResponse<CategoryResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Authentication required"),
        (status = 409, description = "Slug already in use")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_category(
    _user: AuthenticatedUser,
    State(service): State<Arc<CategoryService>>,
    AppJson(dto): AppJson<CreateCategoryDto>,
) -> Result<(StatusCode, Json<ApiResponse<CategoryResponseDto>>), AppError> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let category = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(category), None, None)),
    ))
}

/// Delete a category
#[utoipa::path(
    delete,
    path = "/api/categories/{slug}",
    tag = "categories",
    params(
        ("slug" = String, Path, description = "Category slug")
    ),
    responses(
        (status = 200, description = "Category deleted"),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "Category not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_category(
    _user: AuthenticatedUser,
    State(service): State<Arc<CategoryService>>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    service.delete(&slug).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Category deleted successfully".to_string()),
        None,
    )))
}
