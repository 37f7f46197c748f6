//! Error types for image-resize-service
//!
//! Every variant is fatal to the invocation. Nothing is retried locally; the
//! invoking platform owns redelivery.

use s3_utils::StoreError;
use thiserror::Error;

/// Result type for image-resize-service operations
pub type Result<T> = std::result::Result<T, ResizeError>;

#[derive(Error, Debug)]
pub enum ResizeError {
    /// Source object missing, access denied or store unavailable
    #[error("Failed to fetch s3://{bucket}/{key}: {source}")]
    Fetch {
        bucket: String,
        key: String,
        #[source]
        source: StoreError,
    },

    /// Notification record without a bucket name or object key
    #[error("Notification record is missing its bucket or key (bucket={bucket:?}, key={key:?})")]
    IncompleteRecord {
        bucket: Option<String>,
        key: Option<String>,
    },

    /// Source bytes are not a supported image
    #[error("Failed to decode source image: {0}")]
    Decode(String),

    /// A `widthN` metadata value is not a positive integer
    #[error("Invalid width metadata {name}={value:?}")]
    InvalidWidth { name: String, value: String },

    /// Requested width yields a thumbnail larger than the encoder accepts
    #[error("Thumbnail {width}x{height} exceeds the {format} limit of {limit} pixels per side")]
    Oversized {
        width: u32,
        height: u32,
        format: &'static str,
        limit: u32,
    },

    #[error("Failed to encode {format} thumbnail at width {width}: {message}")]
    Encode {
        width: u32,
        format: &'static str,
        message: String,
    },

    /// Store rejected or failed an upload
    #[error("Failed to publish s3://{bucket}/{key}: {source}")]
    Publish {
        bucket: String,
        key: String,
        #[source]
        source: StoreError,
    },

    /// Blocking image task panicked or was cancelled
    #[error("Thumbnail task failed: {0}")]
    Task(String),
}

impl ResizeError {
    /// Permanent errors caused by the uploaded object itself.
    ///
    /// Redelivering the same event will fail the same way.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ResizeError::IncompleteRecord { .. }
                | ResizeError::Decode(_)
                | ResizeError::InvalidWidth { .. }
                | ResizeError::Oversized { .. }
        )
    }
}
