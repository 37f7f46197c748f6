/// S3 operations backing the [`ObjectStore`] seam
use crate::error::{StoreError, StoreResult};
use crate::metadata::ObjectMetadata;
use crate::{ObjectStore, StoredObject};
use async_trait::async_trait;
use aws_sdk_s3::config::http::HttpResponse;
use aws_sdk_s3::error::{DisplayErrorContext, SdkError};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use bytes::Bytes;
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
pub struct S3Operations {
    client: Arc<Client>,
}

impl S3Operations {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStore for S3Operations {
    /// Download object bytes together with its user metadata
    async fn get_object(&self, bucket: &str, key: &str) -> StoreResult<StoredObject> {
        let response = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| classify("GetObject", e))?;

        let metadata = response
            .metadata()
            .cloned()
            .map(ObjectMetadata::from)
            .unwrap_or_default();
        let content_type = response.content_type().map(str::to_owned);

        let body = response
            .body
            .collect()
            .await
            .map_err(|e| StoreError::Body(e.to_string()))?
            .into_bytes();

        debug!(bucket = %bucket, key = %key, size = body.len(), "Downloaded from S3");

        Ok(StoredObject {
            body,
            metadata,
            content_type,
        })
    }

    /// Upload object bytes, overwriting any existing object at `key`
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: Option<&str>,
    ) -> StoreResult<()> {
        let size = body.len();

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .set_content_type(content_type.map(str::to_owned))
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| classify("PutObject", e))?;

        debug!(bucket = %bucket, key = %key, size, "Uploaded to S3");
        Ok(())
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> StoreResult<()> {
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| classify("DeleteObject", e))?;

        debug!(bucket = %bucket, key = %key, "Deleted from S3");
        Ok(())
    }
}

fn classify<E>(operation: &str, err: SdkError<E, HttpResponse>) -> StoreError
where
    E: std::error::Error + 'static,
{
    let status = err.raw_response().map(|r| r.status().as_u16());
    let message = format!("{operation} failed: {}", DisplayErrorContext(&err));
    StoreError::from_status(status, message)
}
