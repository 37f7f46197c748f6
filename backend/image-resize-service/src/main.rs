//! Image Resize Lambda - S3 object-created handler
//!
//! Fetches the uploaded object, renders one thumbnail per requested width and
//! writes them back to the same bucket.
//!
//! Environment variables:
//! - Quality: WebP quality 0-100 (default: 80)
//! - IsWebP: also emit WebP thumbnails (default: false)
//! - Width: width used when the object has no `width1` metadata (default: 300)
//! - MaxConcurrency: widths processed at once (default: 1)
//! - RollbackOnFailure: delete this invocation's uploads on failure (default: false)
//! - ProcessAllRecords: process every record of a batched event (default: false)
//! - AWS_REGION / S3_ENDPOINT / S3_PATH_STYLE: S3 client overrides
//! - RUST_LOG: log filter (default: info)

use anyhow::anyhow;
use aws_lambda_events::event::s3::S3Event;
use image_resize_service::services::ThumbnailService;
use image_resize_service::{ObjectCreatedNotification, ResizeConfig};
use lambda_runtime::{run, service_fn, LambdaEvent};
use s3_utils::{ObjectStore, S3Client};
use tracing::info;
use tracing_subscriber::EnvFilter;

async fn function_handler<S: ObjectStore>(
    service: &ThumbnailService<S>,
    event: LambdaEvent<S3Event>,
) -> Result<Option<String>, lambda_runtime::Error> {
    let (payload, context) = event.into_parts();
    let notification = ObjectCreatedNotification::from(&payload);

    info!(
        request_id = %context.request_id,
        records = notification.records.len(),
        "Received object-created notification"
    );

    Ok(service.handle(&notification).await?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // CloudWatch adds ingestion time and the runtime prefixes the request
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .without_time()
        .init();

    dotenvy::dotenv().ok();

    let config = ResizeConfig::from_env();
    let s3 = S3Client::new().await;
    let service = ThumbnailService::new(s3.operations(), config);
    let service_ref = &service;

    info!("Starting image resize handler");

    run(service_fn(move |event: LambdaEvent<S3Event>| async move {
        function_handler(service_ref, event).await
    }))
    .await
    .map_err(|e| anyhow!(e))
}
