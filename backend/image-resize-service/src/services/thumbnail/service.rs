//! Thumbnail service - coordinates fetch, decode, render and publish
//!
//! This service handles the complete workflow for one notification record:
//! 1. Download the original object and its metadata
//! 2. Resolve target widths from the metadata
//! 3. Decode it once and check every target size
//! 4. For each width: render, derive keys, upload JPEG (and WebP)
//! 5. Return the JPEG keys in width order

use super::keys;
use super::processor::{ThumbnailProcessor, JPEG_CONTENT_TYPE, WEBP_CONTENT_TYPE};
use super::widths;
use crate::config::ResizeConfig;
use crate::error::{ResizeError, Result};
use crate::event::{NotificationRecord, ObjectCreatedNotification};
use bytes::Bytes;
use futures::stream::{self, StreamExt};
use image::DynamicImage;
use parking_lot::Mutex;
use s3_utils::ObjectStore;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Delimiter between keys in the invocation result
pub const KEY_DELIMITER: &str = ";";

/// One encoded output ready to publish
#[derive(Debug, Clone)]
pub struct Artifact {
    pub key: String,
    pub bytes: Bytes,
    pub content_type: &'static str,
}

/// An artifact that has been written to the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedArtifact {
    pub key: String,
    pub content_type: &'static str,
    pub size: usize,
}

/// Everything published for one width. The JPEG artifact comes first.
#[derive(Debug, Clone)]
pub struct WidthOutput {
    pub width: u32,
    pub height: u32,
    pub artifacts: Vec<PublishedArtifact>,
}

impl WidthOutput {
    pub fn baseline_key(&self) -> &str {
        &self.artifacts[0].key
    }
}

/// Result of processing one notification record
#[derive(Debug, Clone)]
pub struct ProcessingReport {
    pub bucket: String,
    pub source_key: String,
    pub outputs: Vec<WidthOutput>,
}

impl ProcessingReport {
    /// JPEG keys in width order
    pub fn baseline_keys(&self) -> Vec<&str> {
        self.outputs.iter().map(WidthOutput::baseline_key).collect()
    }
}

/// Keys uploaded during one record, for compensation on failure
#[derive(Default)]
struct PublishLedger {
    keys: Mutex<Vec<String>>,
}

impl PublishLedger {
    fn record(&self, key: &str) {
        self.keys.lock().push(key.to_string());
    }

    fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.keys.lock())
    }
}

/// Thumbnail service for generating and publishing width variants
pub struct ThumbnailService<S> {
    store: S,
    processor: Arc<ThumbnailProcessor>,
    config: ResizeConfig,
}

impl<S> ThumbnailService<S>
where
    S: ObjectStore,
{
    /// Create a new thumbnail service
    pub fn new(store: S, config: ResizeConfig) -> Self {
        let processor = Arc::new(ThumbnailProcessor::new(config.encoding.clone()));

        info!(
            quality = config.encoding.quality,
            emit_webp = config.encoding.emit_webp,
            default_width = config.default_width,
            max_concurrency = config.max_concurrency,
            "Thumbnail service initialized"
        );

        Self {
            store,
            processor,
            config,
        }
    }

    pub fn config(&self) -> &ResizeConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Handle one notification.
    ///
    /// Returns `None` when the notification carries no record, otherwise the
    /// JPEG keys joined by [`KEY_DELIMITER`].
    pub async fn handle(&self, notification: &ObjectCreatedNotification) -> Result<Option<String>> {
        let Some(first) = notification.records.first() else {
            debug!("Notification carries no records, nothing to do");
            return Ok(None);
        };

        let records = if self.config.process_all_records {
            notification.records.as_slice()
        } else {
            if notification.records.len() > 1 {
                warn!(
                    skipped = notification.records.len() - 1,
                    "Batched notification: only the first record is processed"
                );
            }
            std::slice::from_ref(first)
        };

        let mut keys = Vec::new();
        for record in records {
            let report = self.process_record(record).await?;
            keys.extend(report.baseline_keys().into_iter().map(str::to_owned));
        }

        Ok(Some(keys.join(KEY_DELIMITER)))
    }

    /// Process a single record, logging failure context before returning it
    pub async fn process_record(&self, record: &NotificationRecord) -> Result<ProcessingReport> {
        let (bucket, key) = match record.location() {
            Ok(location) => location,
            Err(e) => {
                error!(
                    bucket = ?record.bucket,
                    key = ?record.key,
                    error = %e,
                    input_error = e.is_input_error(),
                    "Notification record has no bucket name or object key"
                );
                return Err(e);
            }
        };
        let ledger = PublishLedger::default();

        match self.run(bucket, &key, &ledger).await {
            Ok(report) => {
                info!(
                    bucket = %report.bucket,
                    key = %report.source_key,
                    outputs = ?report.baseline_keys(),
                    "Thumbnails published"
                );
                Ok(report)
            }
            Err(e) => {
                error!(
                    bucket = %bucket,
                    key = %key,
                    error = %e,
                    details = ?e,
                    input_error = e.is_input_error(),
                    "Error processing object. Make sure it exists and the bucket is in the same region as this function"
                );
                if self.config.rollback_on_failure {
                    self.rollback(bucket, &key, ledger.take()).await;
                }
                Err(e)
            }
        }
    }

    async fn run(&self, bucket: &str, key: &str, ledger: &PublishLedger) -> Result<ProcessingReport> {
        let object = self
            .store
            .get_object(bucket, key)
            .await
            .map_err(|source| ResizeError::Fetch {
                bucket: bucket.to_string(),
                key: key.to_string(),
                source,
            })?;

        info!(bucket = %bucket, key = %key, size = object.body.len(), "Fetched source object");

        let widths = widths::resolve_widths(&object.metadata, self.config.default_width)?;
        debug!(key = %key, widths = ?widths, "Resolved target widths");

        let image = Arc::clone(&self.processor).decode_async(object.body).await?;
        // Reject oversized targets before anything is resized or published
        for &width in &widths {
            self.processor.target_size(&image, width)?;
        }

        let concurrency = self.config.max_concurrency.max(1);
        let mut pending = stream::iter(widths)
            .map(move |width| self.process_width(bucket, key, Arc::clone(&image), width, ledger))
            .buffered(concurrency);

        let mut outputs = Vec::new();
        // Dropping `pending` on the first error cancels widths still in flight
        while let Some(output) = pending.next().await {
            outputs.push(output?);
        }

        Ok(ProcessingReport {
            bucket: bucket.to_string(),
            source_key: key.to_string(),
            outputs,
        })
    }

    async fn process_width(
        &self,
        bucket: &str,
        source_key: &str,
        image: Arc<DynamicImage>,
        width: u32,
        ledger: &PublishLedger,
    ) -> Result<WidthOutput> {
        let rendered = Arc::clone(&self.processor)
            .render_async(image, width)
            .await?;

        let baseline_key = keys::baseline_key(source_key, width);
        let mut artifacts = Vec::with_capacity(2);

        let jpeg = Artifact {
            key: baseline_key.clone(),
            bytes: rendered.jpeg,
            content_type: JPEG_CONTENT_TYPE,
        };
        artifacts.push(self.publish(bucket, jpeg, ledger).await?);

        if let Some(bytes) = rendered.webp {
            let webp = Artifact {
                key: keys::secondary_key(source_key, &baseline_key),
                bytes,
                content_type: WEBP_CONTENT_TYPE,
            };
            artifacts.push(self.publish(bucket, webp, ledger).await?);
        }

        Ok(WidthOutput {
            width,
            height: rendered.height,
            artifacts,
        })
    }

    async fn publish(
        &self,
        bucket: &str,
        artifact: Artifact,
        ledger: &PublishLedger,
    ) -> Result<PublishedArtifact> {
        let size = artifact.bytes.len();

        // Recorded before the put: a cancelled upload may still land in the store
        ledger.record(&artifact.key);
        self.store
            .put_object(bucket, &artifact.key, artifact.bytes, Some(artifact.content_type))
            .await
            .map_err(|source| ResizeError::Publish {
                bucket: bucket.to_string(),
                key: artifact.key.clone(),
                source,
            })?;

        debug!(
            bucket = %bucket,
            key = %artifact.key,
            content_type = artifact.content_type,
            size,
            "Published thumbnail"
        );

        Ok(PublishedArtifact {
            key: artifact.key,
            content_type: artifact.content_type,
            size,
        })
    }

    /// Best-effort delete of every key this record attempted to publish.
    ///
    /// Deleting a key that never landed is a no-op. A derived key equal to the
    /// source key (no `_raw` marker) is never deleted.
    async fn rollback(&self, bucket: &str, source_key: &str, mut published: Vec<String>) {
        published.retain(|key| key != source_key);
        published.sort_unstable();
        published.dedup();
        if published.is_empty() {
            return;
        }

        warn!(bucket = %bucket, count = published.len(), "Rolling back published thumbnails");

        for key in &published {
            if let Err(e) = self.store.delete_object(bucket, key).await {
                error!(bucket = %bucket, key = %key, error = %e, "Failed to roll back thumbnail");
            }
        }
    }
}
