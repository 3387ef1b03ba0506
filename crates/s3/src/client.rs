//! S3 store implementation
//!
//! Wraps aws-sdk-s3 and implements the ObjectStore trait from bb-core.

use async_trait::async_trait;
use aws_credential_types::Credentials;
use aws_sdk_s3::error::DisplayErrorContext;

use bb_core::{Error, ListQuery, ObjectMeta, ObjectReader, ObjectStore, RawObject, RawPage, Result};

/// S3-backed object store
pub struct S3Store {
    inner: aws_sdk_s3::Client,
}

impl S3Store {
    /// Create a store from already-resolved credentials.
    ///
    /// `endpoint` selects an S3-compatible server; path-style addressing is
    /// forced there since virtual-host lookup rarely works outside AWS.
    pub async fn new(
        credentials: Credentials,
        region: impl Into<String>,
        endpoint: Option<&str>,
    ) -> Self {
        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .credentials_provider(credentials)
            .region(aws_config::Region::new(region.into()))
            .load()
            .await;

        let mut builder = aws_sdk_s3::config::Builder::from(&config);
        if let Some(url) = endpoint {
            builder = builder.endpoint_url(url).force_path_style(true);
        }

        Self {
            inner: aws_sdk_s3::Client::from_conf(builder.build()),
        }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn list_page(&self, bucket: &str, query: ListQuery) -> Result<RawPage> {
        let mut request = self
            .inner
            .list_objects_v2()
            .bucket(bucket)
            .delimiter(query.delimiter.as_str());

        if !query.prefix.is_empty() {
            request = request.prefix(query.prefix.as_str());
        }

        if let Some(token) = &query.token {
            request = request.continuation_token(token.as_str());
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Storage(format!("{}", DisplayErrorContext(e))))?;

        let common_prefixes = response
            .common_prefixes()
            .iter()
            .filter_map(|p| p.prefix().map(str::to_string))
            .collect();

        let objects = response
            .contents()
            .iter()
            .map(|o| RawObject {
                key: o.key().unwrap_or_default().to_string(),
                size_bytes: o.size().unwrap_or(0),
            })
            .collect();

        Ok(RawPage {
            common_prefixes,
            objects,
            next_token: response.next_continuation_token().map(str::to_string),
        })
    }

    async fn head_object(&self, bucket: &str, key: &str) -> Result<ObjectMeta> {
        let response = self
            .inner
            .head_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error().is_some_and(|se| se.is_not_found()) {
                    Error::NotFound(format!("{bucket}/{key}"))
                } else {
                    Error::Storage(format!("{}", DisplayErrorContext(e)))
                }
            })?;

        let mut meta = ObjectMeta::new(key, response.content_length().unwrap_or(0));

        if let Some(modified) = response.last_modified() {
            meta.last_modified = jiff::Timestamp::from_second(modified.secs()).ok();
        }

        if let Some(etag) = response.e_tag() {
            meta.etag = Some(etag.trim_matches('"').to_string());
        }

        if let Some(ct) = response.content_type() {
            meta.content_type = Some(ct.to_string());
        }

        Ok(meta)
    }

    async fn read_object(&self, bucket: &str, key: &str) -> Result<ObjectReader> {
        tracing::debug!(bucket, key, "opening object stream");

        let response = self
            .inner
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error().is_some_and(|se| se.is_no_such_key()) {
                    Error::NotFound(format!("{bucket}/{key}"))
                } else {
                    Error::Storage(format!("{}", DisplayErrorContext(e)))
                }
            })?;

        Ok(Box::new(response.body.into_async_read()))
    }
}
