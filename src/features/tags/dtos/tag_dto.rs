use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::tags::models::Tag;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTagDto {
    #[validate(length(min = 1, max = 120, message = "Title must be 1-120 characters"))]
    pub title: String,
    /// Generated from the title when omitted.
    pub slug: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TagResponseDto {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Tag> for TagResponseDto {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id,
            title: tag.title,
            slug: tag.slug,
            created_at: tag.created_at,
            updated_at: tag.updated_at,
        }
    }
}
