use sqlx::PgPool;
use tracing::info;

use crate::core::error::{AppError, Result};
use crate::features::categories::dtos::{CategoryResponseDto, CreateCategoryDto};
use crate::features::categories::models::Category;
use crate::shared::validation::{slugify, SLUG_REGEX};

/// Service for category operations
pub struct CategoryService {
    pool: PgPool,
}

impl CategoryService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List all active categories
    pub async fn list(&self) -> Result<Vec<CategoryResponseDto>> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT * FROM categories
            WHERE is_active = TRUE
            ORDER BY title
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list categories: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(categories.into_iter().map(|c| c.into()).collect())
    }

    /// Get category by slug
    pub async fn get_by_slug(&self, slug: &str) -> Result<CategoryResponseDto> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT * FROM categories WHERE slug = $1 AND is_active = TRUE",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        category
            .map(|c| c.into())
            .ok_or_else(|| AppError::NotFound(format!("Category '{}' not found", slug)))
    }

    /// Create a category, deriving the slug from the title when not given
    pub async fn create(&self, dto: CreateCategoryDto) -> Result<CategoryResponseDto> {
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
            "SELECT COUNT(*) FROM categories WHERE slug = $1 AND is_active = TRUE",
        )
        .bind(&slug)
        .fetch_one(&self.pool)
        .await?;

        if existing > 0 {
            return Err(AppError::Conflict(format!(
                "Category with slug '{}' already exists",
                slug
            )));
        }

        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (title, slug)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(&dto.title)
        .bind(&slug)
        .fetch_one(&self.pool)
        .await?;

        info!("Category created: id={}, slug={}", category.id, category.slug);

        Ok(category.into())
    }

    /// Soft delete a category by slug
    pub async fn delete(&self, slug: &str) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE categories
            SET is_active = FALSE, updated_at = NOW()
            WHERE slug = $1 AND is_active = TRUE
            "#,
        )
        .bind(slug)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Category '{}' not found",
                slug
            )));
        }

        info!("Category soft deleted: slug={}", slug);
        Ok(())
    }
}
