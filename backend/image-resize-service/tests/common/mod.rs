//! Shared fixtures for thumbnail pipeline tests
#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use parking_lot::Mutex;
use s3_utils::{ObjectMetadata, ObjectStore, StoreError, StoreResult, StoredObject};
use std::collections::HashMap;
use std::io::Cursor;

pub const BUCKET: &str = "media";

/// A recorded `put_object` call
#[derive(Debug, Clone)]
pub struct PutCall {
    pub bucket: String,
    pub key: String,
    pub body: Bytes,
    pub content_type: Option<String>,
}

/// In-memory object store that records every call
#[derive(Default)]
pub struct MemoryStore {
    objects: Mutex<HashMap<(String, String), StoredObject>>,
    puts: Mutex<Vec<PutCall>>,
    deletes: Mutex<Vec<String>>,
    failing_puts: Mutex<Vec<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, bucket: &str, key: &str, body: Bytes, metadata: &[(&str, &str)]) {
        let object = StoredObject {
            body,
            metadata: metadata.iter().copied().collect::<ObjectMetadata>(),
            content_type: None,
        };
        self.objects
            .lock()
            .insert((bucket.to_string(), key.to_string()), object);
    }

    /// Make every upload to `key` fail
    pub fn fail_puts_to(&self, key: &str) {
        self.failing_puts.lock().push(key.to_string());
    }

    pub fn puts(&self) -> Vec<PutCall> {
        self.puts.lock().clone()
    }

    pub fn put_keys(&self) -> Vec<String> {
        self.puts.lock().iter().map(|p| p.key.clone()).collect()
    }

    pub fn deletes(&self) -> Vec<String> {
        self.deletes.lock().clone()
    }

    pub fn contains(&self, bucket: &str, key: &str) -> bool {
        self.objects
            .lock()
            .contains_key(&(bucket.to_string(), key.to_string()))
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn get_object(&self, bucket: &str, key: &str) -> StoreResult<StoredObject> {
        self.objects
            .lock()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("{bucket}/{key}")))
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: Option<&str>,
    ) -> StoreResult<()> {
        if self.failing_puts.lock().iter().any(|k| k == key) {
            return Err(StoreError::Unavailable(format!("injected failure for {key}")));
        }

        self.puts.lock().push(PutCall {
            bucket: bucket.to_string(),
            key: key.to_string(),
            body: body.clone(),
            content_type: content_type.map(str::to_owned),
        });
        self.objects.lock().insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                body,
                metadata: ObjectMetadata::new(),
                content_type: content_type.map(str::to_owned),
            },
        );
        Ok(())
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> StoreResult<()> {
        self.deletes.lock().push(key.to_string());
        self.objects
            .lock()
            .remove(&(bucket.to_string(), key.to_string()));
        Ok(())
    }
}

/// JPEG-encoded gradient of the given size
pub fn sample_jpeg(width: u32, height: u32) -> Bytes {
    let img = DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 90])
    }));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Jpeg)
        .expect("encode sample jpeg");
    Bytes::from(buf.into_inner())
}

/// Decoded dimensions of an uploaded thumbnail
pub fn dimensions(body: &[u8]) -> (u32, u32) {
    let img = image::load_from_memory(body).expect("decode uploaded thumbnail");
    (img.width(), img.height())
}
