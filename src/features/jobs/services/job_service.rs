use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::core::error::Result;
use crate::features::media::models::Media;
use crate::features::media::services::stored_object_keys;
use crate::modules::storage::SpacesClient;

/// Outcome of a maintenance run.
#[derive(Debug, Default, Serialize, ToSchema)]
pub struct JobRunReport {
    pub purged_media: u64,
    pub deleted_objects: u64,
    pub failed_objects: u64,
}

/// Scheduled maintenance tasks, triggered over HTTP by an external cron.
pub struct JobService {
    pool: PgPool,
    storage: Arc<SpacesClient>,
    media_retention_days: i64,
}

impl JobService {
    pub fn new(pool: PgPool, storage: Arc<SpacesClient>, media_retention_days: i64) -> Self {
        Self {
            pool,
            storage,
            media_retention_days,
        }
    }

    /// Run all maintenance tasks once.
    pub async fn run(&self) -> Result<JobRunReport> {
        let mut report = JobRunReport::default();
        self.purge_deleted_media(&mut report).await?;

        info!(
            "Maintenance run complete: purged={}, objects_deleted={}, objects_failed={}",
            report.purged_media, report.deleted_objects, report.failed_objects
        );

        Ok(report)
    }

    /// Remove media rows soft deleted longer ago than the retention window,
    /// deleting any stored objects that still exist. Object deletion is best
    /// effort, the row is removed either way so a retried run cannot loop on
    /// a missing object.
    async fn purge_deleted_media(&self, report: &mut JobRunReport) -> Result<()> {
        let expired = sqlx::query_as::<_, Media>(
            r#"
            SELECT * FROM media
            WHERE is_active = FALSE
              AND updated_at < NOW() - ($1 * INTERVAL '1 day')
            "#,
        )
        .bind(self.media_retention_days)
        .fetch_all(&self.pool)
        .await?;

        for media in expired {
            for key in stored_object_keys(&media) {
                // A normal delete already removed the objects; only touch
                // ones that are still around
                match self.storage.exists(&key).await {
                    Ok(false) => continue,
                    Ok(true) => match self.storage.delete(&key).await {
                        Ok(()) => report.deleted_objects += 1,
                        Err(e) => {
                            warn!("Failed to delete object '{}': {:?}", key, e);
                            report.failed_objects += 1;
                        }
                    },
                    Err(e) => {
                        warn!("Failed to check object '{}': {:?}", key, e);
                        report.failed_objects += 1;
                    }
                }
            }

            sqlx::query("DELETE FROM media WHERE id = $1")
                .bind(media.id)
                .execute(&self.pool)
                .await?;

            report.purged_media += 1;
            info!("Purged media: id={}", media.id);
        }

        Ok(())
    }
}
