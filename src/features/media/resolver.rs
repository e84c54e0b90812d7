//! Media URL resolution.
//!
//! Media documents persist object keys (`filename` on the document and on
//! each generated size), never URLs. Externally servable URLs are derived
//! on every read by combining those keys with the configured storage
//! endpoint, so a bucket move or domain change never requires a data
//! migration.
//!
//! Resolution is pure string composition over an already-fetched document:
//! no I/O, no locking, safe to run concurrently, and idempotent (it reads
//! only `filename` fields and overwrites `url` fields with the same
//! values on a second pass).

use crate::core::config::StorageConfig;
use crate::features::media::dtos::MediaResponseDto;

/// Strategy for constructing the base URL media keys are appended to.
///
/// Selected once at configuration time; the resolution algorithm itself
/// never changes between deployments.
pub trait UrlTemplate: Send + Sync {
    /// Base URL without a trailing slash
    fn base_url(&self) -> String;
}

/// Provider-generated DigitalOcean Spaces origin:
/// `https://{bucket}.{region}.digitaloceanspaces.com`
pub struct SpacesUrlTemplate {
    pub bucket: String,
    pub region: String,
}

impl UrlTemplate for SpacesUrlTemplate {
    fn base_url(&self) -> String {
        // Empty bucket/region still yields a well-formed (if non-resolving)
        // URL; config validity is a deployment concern
        format!(
            "https://{}.{}.digitaloceanspaces.com",
            self.bucket, self.region
        )
    }
}

/// Custom domain fronting the bucket (e.g. a CDN or vanity subdomain)
pub struct CustomDomainUrlTemplate {
    pub base: String,
}

impl UrlTemplate for CustomDomainUrlTemplate {
    fn base_url(&self) -> String {
        self.base.trim_end_matches('/').to_string()
    }
}

/// Select the URL template for this deployment
pub fn template_from_config(config: &StorageConfig) -> Box<dyn UrlTemplate> {
    match &config.public_domain {
        Some(domain) => Box::new(CustomDomainUrlTemplate {
            base: domain.clone(),
        }),
        None => Box::new(SpacesUrlTemplate {
            bucket: config.bucket.clone(),
            region: config.region.clone(),
        }),
    }
}

/// Rewrite the `url` fields of a freshly-read media document.
///
/// A document without a stored file is passed through untouched. Sizes
/// that were never generated (no `filename`) keep their `url` absent;
/// partial population is expected, not an error. The original is served
/// from `{base}/{filename}` and each generated size from
/// `{base}/{size_name}-{size_filename}`, matching the object keys written
/// by the upload pipeline.
pub fn resolve_media_urls(doc: &mut MediaResponseDto, template: &dyn UrlTemplate) {
    let Some(filename) = doc.filename.as_deref() else {
        return;
    };

    let base = template.base_url();
    doc.url = Some(format!("{}/{}", base, filename));

    for (name, variant) in doc.sizes.iter_mut() {
        if let Some(variant_filename) = variant.filename.as_deref() {
            variant.url = Some(format!("{}/{}-{}", base, name, variant_filename));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::media::models::MediaVariant;
    use chrono::Utc;
    use std::collections::BTreeMap;
    use uuid::Uuid;

    fn doc(filename: Option<&str>, sizes: BTreeMap<String, MediaVariant>) -> MediaResponseDto {
        MediaResponseDto {
            id: Uuid::new_v4(),
            alt: None,
            caption: None,
            filename: filename.map(|f| f.to_string()),
            mime_type: filename.map(|_| "image/png".to_string()),
            filesize: None,
            width: None,
            height: None,
            focal_x: 50.0,
            focal_y: 50.0,
            url: None,
            sizes,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn variant(filename: Option<&str>) -> MediaVariant {
        MediaVariant {
            filename: filename.map(|f| f.to_string()),
            ..MediaVariant::default()
        }
    }

    fn spaces(bucket: &str, region: &str) -> SpacesUrlTemplate {
        SpacesUrlTemplate {
            bucket: bucket.to_string(),
            region: region.to_string(),
        }
    }

    #[test]
    fn document_without_file_is_untouched() {
        let mut document = doc(None, BTreeMap::new());
        let before = document.clone();

        resolve_media_urls(&mut document, &spaces("b", "r"));

        assert_eq!(document, before);
        assert!(document.url.is_none());
    }

    #[test]
    fn original_url_is_bucket_region_filename() {
        let mut document = doc(Some("f.jpg"), BTreeMap::new());

        resolve_media_urls(&mut document, &spaces("b", "r"));

        assert_eq!(
            document.url.as_deref(),
            Some("https://b.r.digitaloceanspaces.com/f.jpg")
        );
    }

    #[test]
    fn generated_sizes_get_prefixed_urls_and_missing_sizes_stay_bare() {
        let mut sizes = BTreeMap::new();
        sizes.insert("thumbnail".to_string(), variant(Some("thumb-key")));
        sizes.insert("square".to_string(), variant(None));
        let mut document = doc(Some("cat.png"), sizes);

        resolve_media_urls(&mut document, &spaces("mybucket", "nyc3"));

        assert_eq!(
            document.url.as_deref(),
            Some("https://mybucket.nyc3.digitaloceanspaces.com/cat.png")
        );
        assert_eq!(
            document.sizes["thumbnail"].url.as_deref(),
            Some("https://mybucket.nyc3.digitaloceanspaces.com/thumbnail-thumb-key")
        );
        assert!(document.sizes["square"].url.is_none());
        assert!(document.sizes["square"].filename.is_none());
    }

    #[test]
    fn resolution_is_idempotent() {
        let mut sizes = BTreeMap::new();
        sizes.insert("thumbnail".to_string(), variant(Some("t.png")));
        let mut document = doc(Some("a.png"), sizes);

        resolve_media_urls(&mut document, &spaces("b", "r"));
        let once = document.clone();
        resolve_media_urls(&mut document, &spaces("b", "r"));

        assert_eq!(document, once);
    }

    #[test]
    fn empty_config_still_yields_well_formed_urls() {
        let mut document = doc(Some("f.jpg"), BTreeMap::new());

        resolve_media_urls(&mut document, &spaces("", ""));

        assert_eq!(
            document.url.as_deref(),
            Some("https://..digitaloceanspaces.com/f.jpg")
        );
    }

    #[test]
    fn custom_domain_template_replaces_provider_origin() {
        let mut sizes = BTreeMap::new();
        sizes.insert("og".to_string(), variant(Some("f-1200x630.jpg")));
        let mut document = doc(Some("f.jpg"), sizes);

        let template = CustomDomainUrlTemplate {
            base: "https://media.example.com/".to_string(),
        };
        resolve_media_urls(&mut document, &template);

        assert_eq!(
            document.url.as_deref(),
            Some("https://media.example.com/f.jpg")
        );
        assert_eq!(
            document.sizes["og"].url.as_deref(),
            Some("https://media.example.com/og-f-1200x630.jpg")
        );
    }

    #[test]
    fn template_selection_follows_public_domain_config() {
        let mut config = StorageConfig {
            endpoint: "https://nyc3.digitaloceanspaces.com".to_string(),
            access_key: String::new(),
            secret_key: String::new(),
            bucket: "mybucket".to_string(),
            region: "nyc3".to_string(),
            public_domain: None,
        };

        assert_eq!(
            template_from_config(&config).base_url(),
            "https://mybucket.nyc3.digitaloceanspaces.com"
        );

        config.public_domain = Some("https://media.example.com".to_string());
        assert_eq!(
            template_from_config(&config).base_url(),
            "https://media.example.com"
        );
    }
}
