//! Image variant generation for the upload pipeline.
//!
//! Each upload produces the renditions the front-end layouts expect, from
//! admin thumbnails up to full-width hero crops and the Open Graph card.
//! Decoding and resizing are CPU-bound and run on a blocking thread from
//! the service layer.

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;

use crate::core::error::AppError;

/// How a size derives its geometry from the source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeMode {
    /// Scale down to the target width, preserving aspect ratio
    Fit,
    /// Scale and center-crop to exactly width x height
    CropCenter,
}

/// One entry of the configured size table
#[derive(Debug, Clone, Copy)]
pub struct ImageSizeSpec {
    pub name: &'static str,
    pub width: u32,
    pub height: Option<u32>,
    pub mode: ResizeMode,
}

/// Renditions generated for every image upload.
///
/// Sizes the source is too small for are skipped rather than upscaled;
/// their map entries exist without a filename.
pub const IMAGE_SIZES: &[ImageSizeSpec] = &[
    ImageSizeSpec {
        name: "thumbnail",
        width: 300,
        height: None,
        mode: ResizeMode::Fit,
    },
    ImageSizeSpec {
        name: "square",
        width: 500,
        height: Some(500),
        mode: ResizeMode::CropCenter,
    },
    ImageSizeSpec {
        name: "small",
        width: 600,
        height: None,
        mode: ResizeMode::Fit,
    },
    ImageSizeSpec {
        name: "medium",
        width: 900,
        height: None,
        mode: ResizeMode::Fit,
    },
    ImageSizeSpec {
        name: "large",
        width: 1400,
        height: None,
        mode: ResizeMode::Fit,
    },
    ImageSizeSpec {
        name: "xlarge",
        width: 1920,
        height: None,
        mode: ResizeMode::Fit,
    },
    ImageSizeSpec {
        name: "og",
        width: 1200,
        height: Some(630),
        mode: ResizeMode::CropCenter,
    },
];

/// A fully generated rendition, ready to be stored
#[derive(Debug, Clone)]
pub struct GeneratedVariant {
    pub filename: String,
    pub width: u32,
    pub height: u32,
    pub mime_type: String,
    pub data: Vec<u8>,
}

/// Result of decoding an upload and generating its renditions
#[derive(Debug)]
pub struct ProcessedUpload {
    pub width: u32,
    pub height: u32,
    /// One entry per configured size, in table order; `None` when the
    /// source was too small for that size
    pub variants: Vec<(&'static str, Option<GeneratedVariant>)>,
}

/// Decode an uploaded image and generate all configured renditions.
///
/// `stem` is the sanitized filename without extension; rendition
/// filenames are `{stem}-{width}x{height}.{ext}`.
pub fn process_upload(
    data: &[u8],
    content_type: &str,
    stem: &str,
    extension: &str,
) -> Result<ProcessedUpload, AppError> {
    let format = ImageFormat::from_mime_type(content_type)
        .ok_or_else(|| AppError::BadRequest(format!("Unsupported image type: {}", content_type)))?;

    let img = image::load_from_memory(data)
        .map_err(|e| AppError::BadRequest(format!("Failed to decode image: {}", e)))?;

    let (src_width, src_height) = img.dimensions();

    let mut variants = Vec::with_capacity(IMAGE_SIZES.len());
    for spec in IMAGE_SIZES {
        let generated = generate_variant(&img, spec, format, content_type, stem, extension)?;
        variants.push((spec.name, generated));
    }

    Ok(ProcessedUpload {
        width: src_width,
        height: src_height,
        variants,
    })
}

fn generate_variant(
    img: &DynamicImage,
    spec: &ImageSizeSpec,
    format: ImageFormat,
    content_type: &str,
    stem: &str,
    extension: &str,
) -> Result<Option<GeneratedVariant>, AppError> {
    let (src_width, src_height) = img.dimensions();

    // Never upscale; a too-small source simply skips the size
    let resized = match spec.mode {
        ResizeMode::Fit => {
            if src_width < spec.width {
                return Ok(None);
            }
            img.thumbnail(spec.width, u32::MAX)
        }
        ResizeMode::CropCenter => {
            let height = spec.height.unwrap_or(spec.width);
            if src_width < spec.width || src_height < height {
                return Ok(None);
            }
            img.resize_to_fill(spec.width, height, FilterType::Lanczos3)
        }
    };

    let (width, height) = resized.dimensions();

    let mut data = Vec::new();
    resized
        .write_to(&mut Cursor::new(&mut data), format)
        .map_err(|e| {
            AppError::Internal(format!(
                "Failed to encode {} rendition: {}",
                spec.name, e
            ))
        })?;

    Ok(Some(GeneratedVariant {
        filename: format!("{}-{}x{}.{}", stem, width, height, extension),
        width,
        height,
        mime_type: content_type.to_string(),
        data,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([12, 34, 56])));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    fn variant_for<'a>(
        processed: &'a ProcessedUpload,
        name: &str,
    ) -> &'a Option<GeneratedVariant> {
        &processed
            .variants
            .iter()
            .find(|(n, _)| *n == name)
            .expect("size missing from table")
            .1
    }

    #[test]
    fn generates_every_size_the_source_can_cover() {
        let processed = process_upload(&png_bytes(800, 600), "image/png", "cat", "png").unwrap();

        assert_eq!((processed.width, processed.height), (800, 600));
        assert_eq!(processed.variants.len(), IMAGE_SIZES.len());

        let thumbnail = variant_for(&processed, "thumbnail").as_ref().unwrap();
        assert_eq!((thumbnail.width, thumbnail.height), (300, 225));
        assert_eq!(thumbnail.filename, "cat-300x225.png");
        assert!(!thumbnail.data.is_empty());

        let square = variant_for(&processed, "square").as_ref().unwrap();
        assert_eq!((square.width, square.height), (500, 500));
        assert_eq!(square.filename, "cat-500x500.png");

        let small = variant_for(&processed, "small").as_ref().unwrap();
        assert_eq!((small.width, small.height), (600, 450));
    }

    #[test]
    fn too_small_source_skips_sizes_instead_of_upscaling() {
        let processed = process_upload(&png_bytes(800, 600), "image/png", "cat", "png").unwrap();

        // 800px wide source cannot cover 900/1400/1920 fits or the 1200x630 crop
        for name in ["medium", "large", "xlarge", "og"] {
            assert!(variant_for(&processed, name).is_none(), "{} should be skipped", name);
        }
    }

    #[test]
    fn tiny_source_produces_no_variants_at_all() {
        let processed = process_upload(&png_bytes(120, 90), "image/png", "icon", "png").unwrap();
        assert!(processed.variants.iter().all(|(_, v)| v.is_none()));
    }

    #[test]
    fn crop_requires_both_dimensions() {
        // Wide enough for the square crop's width but not its height
        let processed = process_upload(&png_bytes(700, 400), "image/png", "strip", "png").unwrap();
        assert!(variant_for(&processed, "square").is_none());
        assert!(variant_for(&processed, "thumbnail").is_some());
    }

    #[test]
    fn undecodable_payload_is_a_bad_request() {
        let result = process_upload(b"definitely not an image", "image/png", "x", "png");
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[test]
    fn unknown_mime_type_is_rejected_before_decoding() {
        let result = process_upload(&png_bytes(10, 10), "application/pdf", "doc", "pdf");
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
