//! Document store trait over the evaluation document bucket

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::error::DomainError;

/// Default lifetime of presigned document links
pub const DEFAULT_PRESIGN_TTL: Duration = Duration::from_secs(300);

/// Folder placeholder keys end with a slash and are never valid targets
pub fn is_folder_key(key: &str) -> bool {
    key.ends_with('/')
}

/// Storage for evaluation documents and the criteria file
#[async_trait]
pub trait DocumentStore: Send + Sync + Debug {
    /// List non-folder object keys under a prefix
    async fn list(&self, prefix: &str) -> Result<Vec<String>, DomainError>;

    /// Upload an object, overwriting any existing one with the same key
    async fn upload(&self, key: &str, body: Bytes) -> Result<(), DomainError>;

    /// Delete an object. Folder-like keys are rejected.
    async fn delete(&self, key: &str) -> Result<(), DomainError>;

    /// Fetch an object's contents
    async fn get(&self, key: &str) -> Result<Bytes, DomainError>;

    /// Produce a time-limited download link for an object
    async fn presigned_url(
        &self,
        bucket: &str,
        key: &str,
        ttl: Duration,
    ) -> Result<String, DomainError>;
}

#[cfg(test)]
pub mod mock {
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use super::*;

    /// In-memory store with deterministic fake presigned links
    #[derive(Debug, Default)]
    pub struct InMemoryDocumentStore {
        objects: Mutex<BTreeMap<String, Bytes>>,
        fail_presign: bool,
        fail_all: bool,
    }

    impl InMemoryDocumentStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_object(self, key: impl Into<String>, body: impl Into<Bytes>) -> Self {
            self.objects.lock().unwrap().insert(key.into(), body.into());
            self
        }

        pub fn failing_presign(mut self) -> Self {
            self.fail_presign = true;
            self
        }

        pub fn failing() -> Self {
            Self {
                fail_all: true,
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl DocumentStore for InMemoryDocumentStore {
        async fn list(&self, prefix: &str) -> Result<Vec<String>, DomainError> {
            if self.fail_all {
                return Err(DomainError::storage("mock storage failure"));
            }

            Ok(self
                .objects
                .lock()
                .unwrap()
                .keys()
                .filter(|k| k.starts_with(prefix) && !is_folder_key(k))
                .cloned()
                .collect())
        }

        async fn upload(&self, key: &str, body: Bytes) -> Result<(), DomainError> {
            if self.fail_all {
                return Err(DomainError::storage("mock storage failure"));
            }

            self.objects.lock().unwrap().insert(key.to_string(), body);
            Ok(())
        }

        async fn delete(&self, key: &str) -> Result<(), DomainError> {
            if self.fail_all {
                return Err(DomainError::storage("mock storage failure"));
            }

            if is_folder_key(key) {
                return Err(DomainError::validation(format!(
                    "refusing to delete folder key '{key}'"
                )));
            }

            self.objects.lock().unwrap().remove(key);
            Ok(())
        }

        async fn get(&self, key: &str) -> Result<Bytes, DomainError> {
            if self.fail_all {
                return Err(DomainError::storage("mock storage failure"));
            }

            self.objects
                .lock()
                .unwrap()
                .get(key)
                .cloned()
                .ok_or_else(|| DomainError::storage(format!("object '{key}' not found")))
        }

        async fn presigned_url(
            &self,
            bucket: &str,
            key: &str,
            ttl: Duration,
        ) -> Result<String, DomainError> {
            if self.fail_all || self.fail_presign {
                return Err(DomainError::link_resolution("mock presign failure"));
            }

            Ok(format!(
                "https://{bucket}.s3.amazonaws.com/{key}?X-Amz-Expires={}",
                ttl.as_secs()
            ))
        }
    }
}
