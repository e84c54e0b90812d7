use sqlx::types::Json;
use sqlx::PgPool;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::media::dtos::{
    get_extension_from_content_type, MediaResponseDto, UpdateMediaDto,
};
use crate::features::media::models::{Media, MediaSizes, MediaVariant};
use crate::features::media::processing::{self, ProcessedUpload};
use crate::features::media::resolver::{resolve_media_urls, UrlTemplate};
use crate::modules::storage::SpacesClient;
use crate::shared::types::PaginationQuery;
use crate::shared::validation::sanitize_filename;

/// Service for the media collection.
///
/// Owns the full document lifecycle: the upload pipeline (decode,
/// generate renditions, store objects, persist), reads with URL
/// resolution applied, metadata updates, and deletion of the document
/// together with all of its stored renditions.
pub struct MediaService {
    pool: PgPool,
    storage: Arc<SpacesClient>,
    url_template: Arc<dyn UrlTemplate>,
}

impl MediaService {
    pub fn new(pool: PgPool, storage: Arc<SpacesClient>, url_template: Arc<dyn UrlTemplate>) -> Self {
        Self {
            pool,
            storage,
            url_template,
        }
    }

    /// Post-read hook: derive servable URLs on the in-memory document
    /// about to be handed to the caller. Runs after every successful
    /// read, before the result becomes observable.
    fn after_read(&self, doc: &mut MediaResponseDto) {
        resolve_media_urls(doc, self.url_template.as_ref());
    }

    /// Upload an image and create its media document.
    ///
    /// Stores the original under its sanitized, uniquified filename and
    /// each generated rendition under `{size_name}-{rendition_filename}`,
    /// the same keys URL resolution reconstructs on read.
    pub async fn upload(
        &self,
        data: Vec<u8>,
        original_filename: &str,
        content_type: &str,
        alt: Option<String>,
    ) -> Result<MediaResponseDto> {
        let extension = get_extension_from_content_type(content_type)
            .ok_or_else(|| AppError::BadRequest(format!("Unsupported image type: {}", content_type)))?;

        let (stem, filename) = self.unique_filename(original_filename, extension).await?;
        let filesize = data.len() as i64;

        // Decode and resize off the async runtime
        let processed = {
            let content_type = content_type.to_string();
            let stem = stem.clone();
            let extension = extension.to_string();
            tokio::task::spawn_blocking(move || {
                processing::process_upload(&data, &content_type, &stem, &extension)
                    .map(|p| (p, data))
            })
            .await
            .map_err(|e| AppError::Internal(format!("Image processing task failed: {}", e)))??
        };
        let (processed, data): (ProcessedUpload, Vec<u8>) = processed;

        // Store the original first, then every generated rendition
        self.storage.upload(&filename, &data, content_type).await?;

        let mut sizes: MediaSizes = BTreeMap::new();
        for (name, generated) in &processed.variants {
            match generated {
                Some(variant) => {
                    let key = format!("{}-{}", name, variant.filename);
                    self.storage
                        .upload(&key, &variant.data, &variant.mime_type)
                        .await?;
                    sizes.insert(
                        name.to_string(),
                        MediaVariant {
                            filename: Some(variant.filename.clone()),
                            width: Some(variant.width),
                            height: Some(variant.height),
                            filesize: Some(variant.data.len() as i64),
                            mime_type: Some(variant.mime_type.clone()),
                            url: None,
                        },
                    );
                }
                None => {
                    sizes.insert(name.to_string(), MediaVariant::default());
                }
            }
        }

        debug!(
            "Stored media '{}' with {} generated sizes",
            filename,
            sizes.values().filter(|v| v.filename.is_some()).count()
        );

        let media = sqlx::query_as::<_, Media>(
            r#"
            INSERT INTO media (alt, filename, mime_type, filesize, width, height, sizes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&alt)
        .bind(&filename)
        .bind(content_type)
        .bind(filesize)
        .bind(processed.width as i32)
        .bind(processed.height as i32)
        .bind(Json(&sizes))
        .fetch_one(&self.pool)
        .await
        .map_err(filename_conflict)?;

        info!(
            "Media created: id={}, filename={}, size={}",
            media.id, filename, filesize
        );

        let mut doc: MediaResponseDto = media.into();
        self.after_read(&mut doc);
        Ok(doc)
    }

    /// Fetch a media document by id
    pub async fn get(&self, id: Uuid) -> Result<MediaResponseDto> {
        let media =
            sqlx::query_as::<_, Media>("SELECT * FROM media WHERE id = $1 AND is_active = TRUE")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        let media = media.ok_or_else(|| AppError::NotFound("Media not found".to_string()))?;

        let mut doc: MediaResponseDto = media.into();
        self.after_read(&mut doc);
        Ok(doc)
    }

    /// List media documents, newest first
    pub async fn list(
        &self,
        pagination: &PaginationQuery,
    ) -> Result<(Vec<MediaResponseDto>, i64)> {
        let total =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM media WHERE is_active = TRUE")
                .fetch_one(&self.pool)
                .await?;

        let media = sqlx::query_as::<_, Media>(
            r#"
            SELECT * FROM media
            WHERE is_active = TRUE
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await?;

        let docs = media
            .into_iter()
            .map(|m| {
                let mut doc: MediaResponseDto = m.into();
                self.after_read(&mut doc);
                doc
            })
            .collect();

        Ok((docs, total))
    }

    /// Update alt text, caption, or focal point
    pub async fn update(&self, id: Uuid, dto: UpdateMediaDto) -> Result<MediaResponseDto> {
        let media = sqlx::query_as::<_, Media>(
            r#"
            UPDATE media
            SET alt = COALESCE($2, alt),
                caption = COALESCE($3, caption),
                focal_x = COALESCE($4, focal_x),
                focal_y = COALESCE($5, focal_y),
                updated_at = NOW()
            WHERE id = $1 AND is_active = TRUE
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&dto.alt)
        .bind(&dto.caption)
        .bind(dto.focal_x)
        .bind(dto.focal_y)
        .fetch_optional(&self.pool)
        .await?;

        let media = media.ok_or_else(|| AppError::NotFound("Media not found".to_string()))?;

        let mut doc: MediaResponseDto = media.into();
        self.after_read(&mut doc);
        Ok(doc)
    }

    /// Delete a media document and every stored object belonging to it.
    ///
    /// Renditions never outlive their parent: the original and all
    /// generated sizes are removed from storage before the row is soft
    /// deleted.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let media =
            sqlx::query_as::<_, Media>("SELECT * FROM media WHERE id = $1 AND is_active = TRUE")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        let media = media.ok_or_else(|| AppError::NotFound("Media not found".to_string()))?;

        for key in stored_object_keys(&media) {
            self.storage.delete(&key).await?;
        }

        sqlx::query(
            r#"
            UPDATE media
            SET is_active = FALSE, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        info!("Media soft deleted: id={}", media.id);

        Ok(())
    }

    /// Find an unused filename near the uploaded one.
    ///
    /// Keeps the sanitized name when free, otherwise appends `-1`, `-2`,
    /// ... and finally falls back to a UUID-suffixed name.
    async fn unique_filename(
        &self,
        original_filename: &str,
        extension: &str,
    ) -> Result<(String, String)> {
        let sanitized = sanitize_filename(original_filename);
        let base_stem = match sanitized.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem.to_string(),
            _ => sanitized,
        };

        for attempt in 0..50 {
            let stem = if attempt == 0 {
                base_stem.clone()
            } else {
                format!("{}-{}", base_stem, attempt)
            };
            let candidate = format!("{}.{}", stem, extension);

            let taken = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM media WHERE filename = $1",
            )
            .bind(&candidate)
            .fetch_one(&self.pool)
            .await?;

            if taken == 0 {
                return Ok((stem, candidate));
            }
        }

        let stem = format!("{}-{}", base_stem, Uuid::new_v4());
        let candidate = format!("{}.{}", stem, extension);
        Ok((stem, candidate))
    }
}

/// Map a unique-index violation on `media.filename` to a retryable
/// conflict. The filename probe in `unique_filename` runs before the
/// insert, so two concurrent uploads can still pick the same name and
/// one of them hits the index.
fn filename_conflict(e: sqlx::Error) -> AppError {
    match e.as_database_error() {
        Some(db) if db.is_unique_violation() => {
            AppError::Conflict("Filename already in use, retry the upload".to_string())
        }
        _ => AppError::Database(e),
    }
}

/// Object keys held by a media document: the original plus one
/// `{size_name}-{filename}` key per generated rendition.
pub fn stored_object_keys(media: &Media) -> Vec<String> {
    let mut keys = Vec::new();
    if let Some(filename) = &media.filename {
        keys.push(filename.clone());
    }
    for (name, variant) in media.sizes.0.iter() {
        if let Some(filename) = &variant.filename {
            keys.push(format!("{}-{}", name, filename));
        }
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn stored_keys_cover_original_and_generated_sizes_only() {
        let mut sizes: MediaSizes = BTreeMap::new();
        sizes.insert(
            "thumbnail".to_string(),
            MediaVariant {
                filename: Some("cat-300x225.png".to_string()),
                ..MediaVariant::default()
            },
        );
        sizes.insert("og".to_string(), MediaVariant::default());

        let media = Media {
            id: Uuid::new_v4(),
            alt: None,
            caption: None,
            filename: Some("cat.png".to_string()),
            mime_type: Some("image/png".to_string()),
            filesize: Some(1024),
            width: Some(800),
            height: Some(600),
            focal_x: 50.0,
            focal_y: 50.0,
            sizes: Json(sizes),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let keys = stored_object_keys(&media);
        assert_eq!(
            keys,
            vec!["cat.png".to_string(), "thumbnail-cat-300x225.png".to_string()]
        );
    }

    #[derive(Debug)]
    struct UniqueViolation;

    impl std::fmt::Display for UniqueViolation {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "duplicate key value violates unique constraint")
        }
    }

    impl std::error::Error for UniqueViolation {}

    impl sqlx::error::DatabaseError for UniqueViolation {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }

        fn kind(&self) -> sqlx::error::ErrorKind {
            sqlx::error::ErrorKind::UniqueViolation
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }
    }

    #[test]
    fn duplicate_filename_insert_maps_to_conflict() {
        let err = filename_conflict(sqlx::Error::Database(Box::new(UniqueViolation)));
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn other_database_errors_pass_through() {
        let err = filename_conflict(sqlx::Error::RowNotFound);
        assert!(matches!(err, AppError::Database(_)));
    }
}
