/// Shared S3 utilities for Nova services
///
/// Provides the [`ObjectStore`] seam used by processing pipelines, plus the
/// AWS S3 client wrapper that implements it.
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::Client;
use bytes::Bytes;
use std::sync::Arc;
use tracing::info;

pub mod config;
pub mod error;
pub mod metadata;
pub mod operations;

pub use config::S3Config;
pub use error::{StoreError, StoreResult};
pub use metadata::ObjectMetadata;
pub use operations::S3Operations;

/// An object fetched from the store
#[derive(Debug, Clone, Default)]
pub struct StoredObject {
    pub body: Bytes,
    pub metadata: ObjectMetadata,
    pub content_type: Option<String>,
}

/// Get/put/delete by `(bucket, key)`
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn get_object(&self, bucket: &str, key: &str) -> StoreResult<StoredObject>;

    /// `content_type` of `None` lets the store pick its default
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: Option<&str>,
    ) -> StoreResult<()>;

    async fn delete_object(&self, bucket: &str, key: &str) -> StoreResult<()>;
}

#[async_trait]
impl<T> ObjectStore for Arc<T>
where
    T: ObjectStore + ?Sized,
{
    async fn get_object(&self, bucket: &str, key: &str) -> StoreResult<StoredObject> {
        (**self).get_object(bucket, key).await
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: Option<&str>,
    ) -> StoreResult<()> {
        (**self).put_object(bucket, key, body, content_type).await
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> StoreResult<()> {
        (**self).delete_object(bucket, key).await
    }
}

/// Shared S3 client wrapper
#[derive(Clone)]
pub struct S3Client {
    client: Arc<Client>,
    config: S3Config,
}

impl S3Client {
    /// Create new S3 client with configuration from environment
    pub async fn new() -> Self {
        Self::with_config(S3Config::from_env()).await
    }

    /// Create new S3 client with custom configuration
    pub async fn with_config(config: S3Config) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        let shared = loader.load().await;

        let mut builder =
            aws_sdk_s3::config::Builder::from(&shared).force_path_style(config.path_style);
        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint_url(endpoint);
        }
        let client = Client::from_conf(builder.build());

        info!(
            region = ?shared.region(),
            endpoint = ?config.endpoint,
            path_style = config.path_style,
            "S3 client initialized"
        );

        Self {
            client: Arc::new(client),
            config,
        }
    }

    /// Get reference to underlying AWS S3 client
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Get S3 configuration
    pub fn config(&self) -> &S3Config {
        &self.config
    }

    /// Object store operations sharing this client
    pub fn operations(&self) -> S3Operations {
        S3Operations::new(Arc::clone(&self.client))
    }
}
