//! Thumbnail generation service
//!
//! This module provides multi-width thumbnail generation:
//! - Width resolution from object metadata
//! - Image processor for resizing and encoding (JPEG, optional WebP)
//! - Output key derivation
//! - Service coordinating fetch, render and publish

pub mod keys;
pub mod processor;
pub mod service;
pub mod widths;

pub use processor::{RenderedThumbnail, ThumbnailProcessor};
pub use service::{ProcessingReport, PublishedArtifact, ThumbnailService, WidthOutput};
pub use widths::resolve_widths;
