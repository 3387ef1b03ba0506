//! ObjectStore trait definition
//!
//! This trait defines the interface the listing/retrieval service consumes.
//! It keeps the core decoupled from the specific S3 SDK implementation and
//! lets tests inject a substitute store. No SDK types cross this boundary.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncRead;

use crate::error::Result;

/// Streaming handle to an object's content.
pub type ObjectReader = Box<dyn AsyncRead + Send + Unpin>;

/// A literal object entry from one listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawObject {
    /// Object key
    pub key: String,

    /// Size in bytes
    pub size_bytes: i64,
}

/// The unmapped result of one paginated listing round-trip: common-prefix
/// groups, literal objects, and the store's next continuation token.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawPage {
    /// Key groups under the delimiter (simulated folders)
    pub common_prefixes: Vec<String>,

    /// Literal objects, in store order
    pub objects: Vec<RawObject>,

    /// Continuation token, absent on the last page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

/// Metadata for a single object, as reported by the store's existence check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectMeta {
    /// Object key
    pub key: String,

    /// Size in bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<i64>,

    /// Human-readable size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_human: Option<String>,

    /// Last modified timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<jiff::Timestamp>,

    /// ETag (usually MD5 for single-part uploads)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,

    /// Content type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

impl ObjectMeta {
    /// Create a new ObjectMeta for an object of known size
    pub fn new(key: impl Into<String>, size: i64) -> Self {
        Self {
            key: key.into(),
            size_bytes: Some(size),
            size_human: Some(humansize::format_size(size as u64, humansize::BINARY)),
            last_modified: None,
            etag: None,
            content_type: None,
        }
    }
}

/// Parameters for one listing round-trip.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    /// Prefix to scope the listing to (empty for the bucket root)
    pub prefix: String,

    /// Delimiter for grouping keys into common prefixes
    pub delimiter: String,

    /// Continuation token from the previous page
    pub token: Option<String>,
}

/// Capability trait for the backing object store.
///
/// Implementations must distinguish "not found" (`Error::NotFound`) from
/// other failures in `head_object` and `read_object`, and must not retry
/// beyond whatever the underlying client already does.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch one listing page scoped to `query.prefix`, grouping keys under
    /// `query.delimiter` and continuing from `query.token` when present.
    async fn list_page(&self, bucket: &str, query: ListQuery) -> Result<RawPage>;

    /// Metadata/existence check for the exact key.
    async fn head_object(&self, bucket: &str, key: &str) -> Result<ObjectMeta>;

    /// Open a streaming read of the object's content.
    async fn read_object(&self, bucket: &str, key: &str) -> Result<ObjectReader>;
}
