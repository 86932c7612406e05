//! Source citations with presigned document links

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::warn;

use crate::domain::retrieval::RetrievedPassage;
use crate::domain::storage::DocumentStore;

/// A source citation for one retrieved passage.
///
/// `link` is a presigned download URL when one could be produced; a citation
/// whose link could not be resolved keeps only the raw `source_uri` text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Citation {
    pub page_content: String,
    pub metadata: HashMap<String, serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// Splits an `s3://bucket/key` URI into bucket and key
pub fn parse_s3_uri(uri: &str) -> Option<(String, String)> {
    let rest = uri.strip_prefix("s3://")?;
    let (bucket, key) = rest.split_once('/')?;

    if bucket.is_empty() || key.is_empty() {
        return None;
    }

    Some((bucket.to_string(), key.to_string()))
}

/// Turns retrieved passages into citations with resolved links
#[derive(Debug, Clone)]
pub struct CitationExtractor {
    store: Arc<dyn DocumentStore>,
    presign_ttl: Duration,
}

impl CitationExtractor {
    pub fn new(store: Arc<dyn DocumentStore>, presign_ttl: Duration) -> Self {
        Self { store, presign_ttl }
    }

    /// Builds one citation per passage, preserving passage order.
    ///
    /// Never fails: missing location metadata and presign failures both
    /// yield a citation without a link; the raw location stays available
    /// in `source_uri` and the metadata.
    pub async fn extract(&self, passages: &[RetrievedPassage]) -> Vec<Citation> {
        let mut citations = Vec::with_capacity(passages.len());

        for passage in passages {
            let source_uri = passage.location().map(String::from);
            let link = match source_uri.as_deref() {
                Some(uri) => self.resolve_link(uri).await,
                None => None,
            };

            citations.push(Citation {
                page_content: passage.text.clone(),
                metadata: passage.metadata.clone(),
                source_uri,
                link,
            });
        }

        citations
    }

    async fn resolve_link(&self, uri: &str) -> Option<String> {
        let Some((bucket, key)) = parse_s3_uri(uri) else {
            warn!(uri, "source uri is not a valid s3 uri, citation has no link");
            return None;
        };

        match self.store.presigned_url(&bucket, &key, self.presign_ttl).await {
            Ok(url) => Some(url),
            Err(e) => {
                warn!(uri, error = %e, "presigning failed, citation has no link");
                None
            }
        }
    }
}
