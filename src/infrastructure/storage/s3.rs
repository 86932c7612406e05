//! S3-backed document store implementation

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::Client as S3Client;
use aws_sdk_s3::presigning::PresigningConfig;
use bytes::Bytes;

use crate::domain::error::DomainError;
use crate::domain::storage::{DocumentStore, is_folder_key};

/// Document store over one S3 bucket
pub struct S3DocumentStore {
    bucket: String,
    client: S3Client,
}

impl Debug for S3DocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3DocumentStore")
            .field("bucket", &self.bucket)
            .finish()
    }
}

impl S3DocumentStore {
    pub fn new(bucket: impl Into<String>, aws_config: &aws_config::SdkConfig) -> Self {
        let client = S3Client::new(aws_config);

        Self {
            bucket: bucket.into(),
            client,
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl DocumentStore for S3DocumentStore {
    async fn list(&self, prefix: &str) -> Result<Vec<String>, DomainError> {
        let response = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(prefix)
            .send()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to list objects: {}", e)))?;

        let keys = response
            .contents()
            .iter()
            .filter_map(|object| object.key())
            .filter(|key| !is_folder_key(key))
            .map(String::from)
            .collect();

        Ok(keys)
    }

    async fn upload(&self, key: &str, body: Bytes) -> Result<(), DomainError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body.into())
            .send()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to upload '{}': {}", key, e)))?;

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), DomainError> {
        if is_folder_key(key) {
            return Err(DomainError::validation(format!(
                "refusing to delete folder key '{key}'"
            )));
        }

        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete '{}': {}", key, e)))?;

        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Bytes, DomainError> {
        let response = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get '{}': {}", key, e)))?;

        let data = response
            .body
            .collect()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to read '{}': {}", key, e)))?;

        Ok(data.into_bytes())
    }

    async fn presigned_url(
        &self,
        bucket: &str,
        key: &str,
        ttl: Duration,
    ) -> Result<String, DomainError> {
        let presigning = PresigningConfig::expires_in(ttl)
            .map_err(|e| DomainError::link_resolution(format!("Invalid presign TTL: {}", e)))?;

        let request = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| {
                DomainError::link_resolution(format!("Failed to presign '{}': {}", key, e))
            })?;

        Ok(request.uri().to_string())
    }
}
