use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use std::collections::BTreeMap;
use utoipa::ToSchema;
use uuid::Uuid;

/// Named derived renditions of a media document, keyed by size name
/// ("thumbnail", "square", ...). A key is present for every configured
/// size; `filename` is absent when that rendition could not be generated.
pub type MediaSizes = BTreeMap<String, MediaVariant>;

/// One derived rendition of an uploaded asset.
///
/// `url` is derived by the read-time resolver and never persisted; the
/// stored representation only ever carries the object key and dimensions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MediaVariant {
    /// Object key of this rendition, absent if it was not generated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filesize: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// Servable URL, filled in on read only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Database model for media documents
#[derive(Debug, FromRow)]
pub struct Media {
    pub id: Uuid,
    pub alt: Option<String>,
    /// Rich-text caption stored as opaque editor JSON
    pub caption: Option<serde_json::Value>,
    /// Object key of the original upload; absent means no file attached
    pub filename: Option<String>,
    pub mime_type: Option<String>,
    pub filesize: Option<i64>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    /// Focal point percentages used by front-end crops
    pub focal_x: f64,
    pub focal_y: f64,
    pub sizes: Json<MediaSizes>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
