//! Image Resize Service
//!
//! Reacts to S3 object-created notifications and publishes width variants of
//! the uploaded image back to the same bucket.

pub mod config;
pub mod error;
pub mod event;
pub mod services;

// Public re-exports
pub use config::{EncodingConfig, ResizeConfig};
pub use error::{ResizeError, Result};
pub use event::{NotificationRecord, ObjectCreatedNotification};
