use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::categories::models::Category;

/// Request DTO for creating a category
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCategoryDto {
    /// Category title
    #[validate(length(min = 1, max = 120, message = "title must be 1-120 characters"))]
    pub title: String,
    /// Optional explicit slug; derived from the title when omitted
    pub slug: Option<String>,
}

/// Response DTO for categories
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponseDto {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

impl From<Category> for CategoryResponseDto {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            title: category.title,
            slug: category.slug,
            created_at: category.created_at,
        }
    }
}
