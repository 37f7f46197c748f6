//! Object-created notifications
//!
//! Converts the platform `S3Event` into the records the thumbnail service
//! works on.

use crate::error::{ResizeError, Result};
use aws_lambda_events::event::s3::S3Event;

/// One `(bucket, key)` pair that triggered the invocation.
///
/// Either side may be absent in a malformed event. Records keep their position
/// in the event so an incomplete first record is never replaced by the next one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRecord {
    pub bucket: Option<String>,
    /// Object key exactly as delivered (URL-encoded)
    pub key: Option<String>,
}

impl NotificationRecord {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: Some(bucket.into()),
            key: Some(key.into()),
        }
    }

    /// Bucket name and decoded object key
    pub fn location(&self) -> Result<(&str, String)> {
        match (self.bucket.as_deref(), self.key.as_deref()) {
            (Some(bucket), Some(key)) => Ok((bucket, decode_object_key(key))),
            _ => Err(ResizeError::IncompleteRecord {
                bucket: self.bucket.clone(),
                key: self.key.clone(),
            }),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectCreatedNotification {
    pub records: Vec<NotificationRecord>,
}

impl ObjectCreatedNotification {
    pub fn single(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            records: vec![NotificationRecord::new(bucket, key)],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl From<&S3Event> for ObjectCreatedNotification {
    fn from(event: &S3Event) -> Self {
        let records = event
            .records
            .iter()
            .map(|record| NotificationRecord {
                bucket: record.s3.bucket.name.clone(),
                key: record.s3.object.key.clone(),
            })
            .collect();

        Self { records }
    }
}

/// Decode an S3 notification key.
///
/// Keys arrive form-encoded: `+` is a space and `%XX` an escaped byte.
/// Malformed escapes are kept literally; invalid UTF-8 is replaced.
pub fn decode_object_key(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    let decoded = urlencoding::decode_binary(spaced.as_bytes());
    String::from_utf8_lossy(&decoded).into_owned()
}
