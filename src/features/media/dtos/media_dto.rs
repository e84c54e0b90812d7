use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::media::models::{Media, MediaSizes};

/// Upload request DTO for OpenAPI documentation
/// Note: This struct is for Swagger UI documentation only.
/// The actual handler uses axum's Multipart extractor directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadMediaDto {
    /// The image file to upload
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
    /// Alternative text for the asset
    #[schema(example = "Chief minister addressing the press")]
    pub alt: Option<String>,
}

/// Request DTO for updating media metadata.
///
/// Partial update: only fields present in the body are written. A JSON
/// `null` deserializes the same as an omitted field, so a value already
/// set cannot be cleared back to null through this endpoint.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateMediaDto {
    /// Alternative text
    pub alt: Option<String>,
    /// Rich-text caption as editor JSON
    pub caption: Option<serde_json::Value>,
    /// Horizontal focal point percentage
    #[validate(range(min = 0.0, max = 100.0, message = "focal_x must be between 0 and 100"))]
    pub focal_x: Option<f64>,
    /// Vertical focal point percentage
    #[validate(range(min = 0.0, max = 100.0, message = "focal_y must be between 0 and 100"))]
    pub focal_y: Option<f64>,
}

/// A media document as returned to API callers.
///
/// `url` fields (top-level and per size) are recomputed on every read
/// from the stored object keys and the configured storage endpoint; they
/// are never read back from storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MediaResponseDto {
    pub id: Uuid,
    pub alt: Option<String>,
    pub caption: Option<serde_json::Value>,
    /// Object key of the original upload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filesize: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<i32>,
    pub focal_x: f64,
    pub focal_y: f64,
    /// Servable URL for the original, derived on read
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub sizes: MediaSizes,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Media> for MediaResponseDto {
    fn from(media: Media) -> Self {
        Self {
            id: media.id,
            alt: media.alt,
            caption: media.caption,
            filename: media.filename,
            mime_type: media.mime_type,
            filesize: media.filesize,
            width: media.width,
            height: media.height,
            focal_x: media.focal_x,
            focal_y: media.focal_y,
            url: None,
            sizes: media.sizes.0,
            created_at: media.created_at,
            updated_at: media.updated_at,
        }
    }
}

/// Allowed MIME types for media uploads
pub const ALLOWED_MIME_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Maximum upload size in bytes (20MB)
pub const MAX_FILE_SIZE: usize = 20 * 1024 * 1024;

/// Check if a MIME type is allowed
pub fn is_mime_type_allowed(content_type: &str) -> bool {
    ALLOWED_MIME_TYPES.contains(&content_type)
}

/// Get file extension from content type
pub fn get_extension_from_content_type(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_treats_null_and_omitted_fields_alike() {
        let omitted: UpdateMediaDto = serde_json::from_str("{}").unwrap();
        let explicit_null: UpdateMediaDto =
            serde_json::from_str(r#"{"alt": null, "caption": null}"#).unwrap();

        assert!(omitted.alt.is_none());
        assert!(explicit_null.alt.is_none());
        assert!(explicit_null.caption.is_none());
    }
}
