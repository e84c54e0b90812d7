use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::users::models::{AuthenticatedUser, User};

/// Request DTO for credential login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginDto {
    /// Account email
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    /// Account password
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Response DTO for a successful login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponseDto {
    /// Bearer token for subsequent requests
    pub token: String,
    pub user: AuthenticatedUser,
}

/// Request DTO for creating a user (admin only)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserDto {
    /// Display name, also used to derive the slug
    pub name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
    /// Roles to assign ("admin", "editor")
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Response DTO for user records
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponseDto {
    pub id: Uuid,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub email: String,
    pub roles: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponseDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            slug: user.slug,
            email: user.email,
            roles: user.roles,
            created_at: user.created_at,
        }
    }
}
