use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::tags::dtos::{CreateTagDto, TagResponseDto};
use crate::features::tags::models::Tag;
use crate::shared::validation::{slugify, SLUG_REGEX};

pub struct TagService {
    pool: PgPool,
}

impl TagService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<TagResponseDto>> {
        let tags = sqlx::query_as::<_, Tag>(
            "SELECT * FROM tags WHERE is_active = TRUE ORDER BY title",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(tags.into_iter().map(|t| t.into()).collect())
    }

    pub async fn create(&self, dto: CreateTagDto) -> Result<TagResponseDto> {
        let slug = match dto.slug {
            Some(slug) => slug,
            None => slugify(&dto.title),
        };

        if !SLUG_REGEX.is_match(&slug) {
            return Err(AppError::Validation(format!(
                "'{}' is not a valid slug",
                slug
            )));
        }

        let existing = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM tags WHERE slug = $1 AND is_active = TRUE",
        )
        .bind(&slug)
        .fetch_one(&self.pool)
        .await?;

        if existing > 0 {
            return Err(AppError::Conflict(format!(
                "Tag with slug '{}' already exists",
                slug
            )));
        }

        let tag = sqlx::query_as::<_, Tag>(
            r#"
            INSERT INTO tags (title, slug)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(&dto.title)
        .bind(&slug)
        .fetch_one(&self.pool)
        .await?;

        info!("Tag created: id={}, slug={}", tag.id, tag.slug);

        Ok(tag.into())
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE tags
            SET is_active = FALSE, updated_at = NOW()
            WHERE id = $1 AND is_active = TRUE
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Tag not found".to_string()));
        }

        info!("Tag soft deleted: id={}", id);
        Ok(())
    }
}
