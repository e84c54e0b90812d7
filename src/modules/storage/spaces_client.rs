//! DigitalOcean Spaces storage client
//!
//! Thin wrapper over the rust-s3 crate for object upload, deletion, and
//! existence checks. Publicly reachable URLs for stored objects are not
//! built here; that is the media URL resolver's job.

use s3::creds::Credentials;
use s3::{Bucket, BucketConfiguration, Region};
use tracing::{debug, info, warn};

use crate::core::config::StorageConfig;
use crate::core::error::AppError;

/// S3-compatible storage client for the media bucket
pub struct SpacesClient {
    bucket: Box<Bucket>,
    region: Region,
    credentials: Credentials,
}

impl SpacesClient {
    /// Create a new storage client from configuration.
    ///
    /// Also ensures the bucket exists, creating it when missing.
    pub async fn new(config: StorageConfig) -> Result<Self, AppError> {
        let credentials = Credentials::new(
            Some(&config.access_key),
            Some(&config.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| AppError::Storage(format!("Failed to create storage credentials: {}", e)))?;

        let region = Region::Custom {
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
        };

        let mut bucket = Bucket::new(&config.bucket, region.clone(), credentials.clone())
            .map_err(|e| AppError::Storage(format!("Failed to open bucket: {}", e)))?;

        // Path-style URLs work against both Spaces and local S3 stands-ins
        bucket.set_path_style();

        let client = Self {
            bucket,
            region,
            credentials,
        };

        client.ensure_bucket_exists().await?;

        info!(
            "Storage client initialized for endpoint: {}, bucket: {}",
            config.endpoint,
            client.bucket.name()
        );

        Ok(client)
    }

    /// Ensure the bucket exists, create if not
    pub async fn ensure_bucket_exists(&self) -> Result<(), AppError> {
        // Creating an existing bucket returns an "already owned" style
        // error, which is safe to ignore
        match self.create_bucket().await {
            Ok(_) => {
                info!("Bucket '{}' created successfully", self.bucket.name());
                Ok(())
            }
            Err(e) => {
                let error_str = e.to_string();
                if error_str.contains("BucketAlreadyOwnedByYou")
                    || error_str.contains("BucketAlreadyExists")
                    || error_str.contains("already own it")
                {
                    debug!("Bucket '{}' already exists", self.bucket.name());
                    Ok(())
                } else {
                    // Spaces buckets are usually provisioned out-of-band;
                    // log and assume it exists
                    warn!(
                        "Could not create bucket '{}': {}. Assuming it exists.",
                        self.bucket.name(),
                        e
                    );
                    Ok(())
                }
            }
        }
    }

    async fn create_bucket(&self) -> Result<(), AppError> {
        let bucket_config = BucketConfiguration::default();

        Bucket::create_with_path_style(
            &self.bucket.name(),
            self.region.clone(),
            self.credentials.clone(),
            bucket_config,
        )
        .await
        .map_err(|e| {
            AppError::Storage(format!(
                "Failed to create bucket '{}': {}",
                self.bucket.name(),
                e
            ))
        })?;

        Ok(())
    }

    /// Upload an object to the bucket.
    ///
    /// # Arguments
    /// * `key` - The object key (path) in the bucket
    /// * `data` - The object content as bytes
    /// * `content_type` - The MIME type of the object
    pub async fn upload(&self, key: &str, data: &[u8], content_type: &str) -> Result<(), AppError> {
        self.bucket
            .put_object_with_content_type(key, data, content_type)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to upload object '{}': {}", key, e)))?;

        debug!("Uploaded object '{}' to bucket '{}'", key, self.bucket.name());
        Ok(())
    }

    /// Delete an object from the bucket
    pub async fn delete(&self, key: &str) -> Result<(), AppError> {
        self.bucket
            .delete_object(key)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to delete object '{}': {}", key, e)))?;

        debug!(
            "Deleted object '{}' from bucket '{}'",
            key,
            self.bucket.name()
        );
        Ok(())
    }

    /// Check whether an object exists in the bucket
    pub async fn exists(&self, key: &str) -> Result<bool, AppError> {
        match self.bucket.head_object(key).await {
            Ok(_) => Ok(true),
            Err(e) => {
                let error_str = e.to_string();
                if error_str.contains("404") || error_str.contains("NoSuchKey") {
                    Ok(false)
                } else {
                    Err(AppError::Storage(format!(
                        "Failed to check if object '{}' exists: {}",
                        key, e
                    )))
                }
            }
        }
    }

    /// Get the bucket name
    pub fn bucket_name(&self) -> String {
        self.bucket.name()
    }
}
