//! Thumbnail processor - renders width-constrained thumbnails from a decoded image
//!
//! Resizes to the requested width while maintaining aspect ratio, encodes a
//! JPEG at the encoder's default quality, and optionally a lossy WebP at the
//! configured quality.
//!
//! Uses `spawn_blocking` for CPU-intensive operations to avoid blocking the async runtime.

use crate::config::EncodingConfig;
use crate::error::{ResizeError, Result};
use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use std::sync::Arc;
use tracing::debug;

pub const JPEG_CONTENT_TYPE: &str = "image/jpeg";
pub const WEBP_CONTENT_TYPE: &str = "image/webp";

/// Largest side the JPEG encoder accepts
pub const MAX_JPEG_DIMENSION: u32 = 65_535;

/// Largest side libwebp accepts
pub const MAX_WEBP_DIMENSION: u32 = 16_383;

/// Encoded output for one width
#[derive(Debug, Clone)]
pub struct RenderedThumbnail {
    pub width: u32,
    pub height: u32,
    /// Always present
    pub jpeg: Bytes,
    /// Present only when WebP emission is enabled
    pub webp: Option<Bytes>,
}

/// Thumbnail processor
pub struct ThumbnailProcessor {
    config: EncodingConfig,
}

impl ThumbnailProcessor {
    /// Create a new processor with the given configuration
    pub fn new(config: EncodingConfig) -> Self {
        Self { config }
    }

    /// Create a processor with default configuration
    pub fn with_defaults() -> Self {
        Self::new(EncodingConfig::default())
    }

    pub fn config(&self) -> &EncodingConfig {
        &self.config
    }

    /// Decode source bytes (blocking version)
    pub fn decode(&self, data: &[u8]) -> Result<DynamicImage> {
        let img = image::load_from_memory(data)
            .map_err(|e| ResizeError::Decode(e.to_string()))?;

        let (w, h) = img.dimensions();
        if w == 0 || h == 0 {
            return Err(ResizeError::Decode(format!("Image has no pixels ({w}x{h})")));
        }

        debug!(original_width = w, original_height = h, "Decoded source image");
        Ok(img)
    }

    /// Decode source bytes on the blocking thread pool
    pub async fn decode_async(self: Arc<Self>, data: Bytes) -> Result<Arc<DynamicImage>> {
        tokio::task::spawn_blocking(move || self.decode(&data).map(Arc::new))
            .await
            .map_err(|e| ResizeError::Task(format!("Decode task panicked: {e}")))?
    }

    /// Thumbnail size for `width`, checked against every enabled encoder's limit
    pub fn target_size(&self, img: &DynamicImage, width: u32) -> Result<(u32, u32)> {
        let (orig_w, orig_h) = img.dimensions();
        let height = calculate_height(orig_w, orig_h, width);

        let (format, limit) = if self.config.emit_webp {
            ("WebP", MAX_WEBP_DIMENSION)
        } else {
            ("JPEG", MAX_JPEG_DIMENSION)
        };
        if width > limit || height > limit {
            return Err(ResizeError::Oversized {
                width,
                height,
                format,
                limit,
            });
        }

        Ok((width, height))
    }

    /// Render one width (blocking version)
    ///
    /// **Note:** This method performs CPU-intensive operations and should not be called
    /// directly from async code. Use `render_async` instead.
    pub fn render(&self, img: &DynamicImage, width: u32) -> Result<RenderedThumbnail> {
        let (orig_w, orig_h) = img.dimensions();
        let (width, height) = self.target_size(img, width)?;

        let resized = if (orig_w, orig_h) == (width, height) {
            img.clone()
        } else {
            img.resize_exact(width, height, FilterType::Lanczos3)
        };

        let jpeg = encode_jpeg(&resized, width)?;
        let webp = if self.config.emit_webp {
            Some(encode_webp(&resized, width, self.config.quality)?)
        } else {
            None
        };

        debug!(
            width,
            height,
            jpeg_size = jpeg.len(),
            webp_size = webp.as_ref().map(Bytes::len),
            "Thumbnail rendered"
        );

        Ok(RenderedThumbnail {
            width,
            height,
            jpeg,
            webp,
        })
    }

    /// Render one width on the blocking thread pool.
    ///
    /// The decoded image is shared, so callers decode once and render many widths.
    pub async fn render_async(
        self: Arc<Self>,
        img: Arc<DynamicImage>,
        width: u32,
    ) -> Result<RenderedThumbnail> {
        tokio::task::spawn_blocking(move || self.render(&img, width))
            .await
            .map_err(|e| ResizeError::Task(format!("Thumbnail task panicked: {e}")))?
    }
}

/// Height preserving the source aspect ratio at `width` (never below 1)
pub fn calculate_height(orig_w: u32, orig_h: u32, width: u32) -> u32 {
    if orig_w == 0 {
        return 1;
    }
    let ratio = width as f64 / orig_w as f64;
    ((orig_h as f64) * ratio).round().max(1.0) as u32
}

/// Encode as JPEG at the encoder default quality (75). Alpha is dropped.
fn encode_jpeg(img: &DynamicImage, width: u32) -> Result<Bytes> {
    let rgb = img.to_rgb8();
    let mut buf = Vec::new();

    JpegEncoder::new(&mut buf)
        .encode_image(&rgb)
        .map_err(|e| ResizeError::Encode {
            width,
            format: "JPEG",
            message: e.to_string(),
        })?;

    Ok(Bytes::from(buf))
}

/// Encode as lossy WebP at `quality`
fn encode_webp(img: &DynamicImage, width: u32, quality: u8) -> Result<Bytes> {
    // libwebp only accepts 8-bit RGB/RGBA buffers
    let normalized = if img.color().has_alpha() {
        DynamicImage::ImageRgba8(img.to_rgba8())
    } else {
        DynamicImage::ImageRgb8(img.to_rgb8())
    };

    let encoder = webp::Encoder::from_image(&normalized).map_err(|e| ResizeError::Encode {
        width,
        format: "WebP",
        message: e.to_string(),
    })?;
    let encoded = encoder
        .encode_simple(false, quality as f32)
        .map_err(|e| ResizeError::Encode {
            width,
            format: "WebP",
            message: format!("{e:?}"),
        })?;

    Ok(Bytes::copy_from_slice(&encoded))
}
