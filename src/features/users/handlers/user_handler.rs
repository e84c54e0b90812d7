use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::AppError;
use crate::core::extractor::AppJson;
use crate::features::users::dtos::{CreateUserDto, LoginDto, LoginResponseDto, UserResponseDto};
use crate::features::users::guards::RequireAdmin;
use crate::features::users::models::AuthenticatedUser;
use crate::features::users::routes::UsersState;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// Log in with email and password
///
/// Returns a bearer token for the authenticated routes.
#[utoipa::path(
    post,
    path = "/api/users/login",
    tag = "users",
    request_body = LoginDto,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<LoginResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<UsersState>,
    AppJson(dto): AppJson<LoginDto>,
) -> Result<Json<ApiResponse<LoginResponseDto>>, AppError> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let user = state.users.authenticate(&dto.email, &dto.password).await?;
    let token = state.tokens.issue(&user)?;

    Ok(Json(ApiResponse::success(
        Some(LoginResponseDto { token, user }),
        None,
        None,
    )))
}

/// Get the currently authenticated user
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "users",
    responses(
        (status = 200, description = "Current user", body = ApiResponse<UserResponseDto>),
        (status = 401, description = "Authentication required")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_me(
    user: AuthenticatedUser,
    State(state): State<UsersState>,
) -> Result<Json<ApiResponse<UserResponseDto>>, AppError> {
    let profile = state.users.get(user.id).await?;
    Ok(Json(ApiResponse::success(Some(profile), None, None)))
}

/// Create a user (admin only)
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "users",
    request_body = CreateUserDto,
    responses(
        (status = 201, description = "User created", body = ApiResponse<UserResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Admin access required"),
        (status = 409, description = "Email already in use")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_user(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<UsersState>,
    AppJson(dto): AppJson<CreateUserDto>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponseDto>>), AppError> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let user = state.users.create(dto).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(user), None, None)),
    ))
}

/// Get a user by id
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "users",
    params(
        ("id" = Uuid, Path, description = "User id")
    ),
    responses(
        (status = 200, description = "User", body = ApiResponse<UserResponseDto>),
        (status = 404, description = "User not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_user(
    _user: AuthenticatedUser,
    State(state): State<UsersState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<UserResponseDto>>, AppError> {
    let user = state.users.get(id).await?;
    Ok(Json(ApiResponse::success(Some(user), None, None)))
}

/// List users
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "users",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Users", body = ApiResponse<Vec<UserResponseDto>>),
        (status = 401, description = "Authentication required")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_users(
    _user: AuthenticatedUser,
    State(state): State<UsersState>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<UserResponseDto>>>, AppError> {
    let (users, total) = state.users.list(&pagination).await?;
    Ok(Json(ApiResponse::success(
        Some(users),
        None,
        Some(Meta { total }),
    )))
}
