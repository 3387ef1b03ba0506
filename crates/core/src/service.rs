//! Listing and retrieval service
//!
//! Translates the store's flat key namespace into the folder/file
//! abstraction: lists one folder level per call with pagination, fetches a
//! single resource's metadata, and downloads a file's content to local disk
//! via a streaming copy.
//!
//! The service is stateless per call. The store client, bucket, and download
//! directory are fixed at construction; callers own the pagination loop.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::error::{Error, Result};
use crate::keys;
use crate::resource::{Download, Page, Resource};
use crate::store::{ListQuery, ObjectStore};

/// Hierarchy delimiter passed to every listing request.
const DELIMITER: &str = "/";

/// Chunk size for the streaming download copy.
const COPY_CHUNK_BYTES: usize = 16 * 1024;

/// Service over one bucket of an injected object store.
pub struct ResourceService {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    download_dir: PathBuf,
}

impl ResourceService {
    /// Create a service for `bucket`, downloading into `download_dir`.
    ///
    /// The store client is injected rather than built internally so the
    /// service can be driven against a substitute implementation.
    pub fn new(
        store: Arc<dyn ObjectStore>,
        bucket: impl Into<String>,
        download_dir: impl Into<PathBuf>,
    ) -> Self {
        let bucket = bucket.into();
        let download_dir = download_dir.into();
        tracing::info!(
            bucket = %bucket,
            download_dir = %download_dir.display(),
            "resource service created"
        );
        Self {
            store,
            bucket,
            download_dir,
        }
    }

    /// The bucket this service is scoped to.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// List one folder level, returning a single page of resources.
    ///
    /// `parent` is `None` for the bucket root, or a folder resource; a file
    /// resource is rejected before any network call. `cursor` must be the
    /// cursor from the previous page of the same listing, or `None` for the
    /// first page. Folders come first, then files, both in store order; a
    /// placeholder object whose key equals the prefix is excluded.
    pub async fn list_folder(
        &self,
        parent: Option<&Resource>,
        cursor: Option<&str>,
    ) -> Result<Page<Resource>> {
        let prefix = match parent {
            None => String::new(),
            Some(res) if res.is_folder() => keys::ensure_trailing_slash(&res.id),
            Some(res) => {
                return Err(Error::InvalidArgument(format!(
                    "cannot list a file resource: '{}'",
                    res.id
                )));
            }
        };

        tracing::debug!(bucket = %self.bucket, prefix = %prefix, cursor = ?cursor, "listing folder");

        let query = ListQuery {
            prefix: prefix.clone(),
            delimiter: DELIMITER.to_string(),
            token: cursor.map(str::to_string),
        };

        let raw = self
            .store
            .list_page(&self.bucket, query)
            .await
            .map_err(|e| {
                tracing::error!(bucket = %self.bucket, prefix = %prefix, "listing failed: {e}");
                Error::Storage(format!(
                    "failed to list bucket '{}' prefix '{}': {e}",
                    self.bucket, prefix
                ))
            })?;

        let mut items = Vec::with_capacity(raw.common_prefixes.len() + raw.objects.len());

        // Subfolders from common-prefix groups
        for folder_key in raw.common_prefixes {
            items.push(Resource::folder(folder_key));
        }

        // Files; skip the zero-byte placeholder object some tools create to
        // make an empty folder visible (its key is exactly the prefix)
        for obj in raw.objects {
            if obj.key.ends_with(keys::SEPARATOR) && obj.key == prefix {
                continue;
            }
            items.push(Resource::file(obj.key));
        }

        Ok(Page {
            items,
            cursor: raw.next_token,
        })
    }

    /// Fetch a single resource's metadata by exact key.
    ///
    /// The kind is derived structurally from the trailing separator, not
    /// from the store, which has no native directory concept. An empty key
    /// is permitted.
    pub async fn get_resource(&self, id: &str) -> Result<Resource> {
        tracing::debug!(bucket = %self.bucket, key = %id, "fetching resource metadata");

        match self.store.head_object(&self.bucket, id).await {
            Ok(meta) => {
                tracing::debug!(
                    key = %id,
                    size = ?meta.size_bytes,
                    etag = ?meta.etag,
                    "resource metadata retrieved"
                );
                Ok(Resource::from_key(id))
            }
            Err(Error::NotFound(_)) => {
                tracing::warn!(bucket = %self.bucket, key = %id, "object not found");
                Err(Error::NotFound(format!("resource not found: '{id}'")))
            }
            Err(e) => Err(Error::Storage(format!(
                "failed to retrieve metadata for '{}/{id}': {e}",
                self.bucket
            ))),
        }
    }

    /// Download a file resource into the configured directory, preserving
    /// its display name.
    ///
    /// The content is copied in fixed-size chunks without buffering the
    /// whole object. Both endpoints are dropped on every exit path; a
    /// failed download may leave a partial file behind.
    pub async fn get_as_file(&self, resource: &Resource) -> Result<Download> {
        if resource.is_folder() {
            return Err(Error::InvalidArgument(format!(
                "cannot download a folder as a file: '{}'",
                resource.id
            )));
        }

        let key = &resource.id;
        let target = self.download_dir.join(keys::display_name(key));
        tracing::debug!(bucket = %self.bucket, key = %key, target = %target.display(), "downloading object");

        tokio::fs::create_dir_all(&self.download_dir)
            .await
            .map_err(|e| {
                Error::Io(format!(
                    "failed to create download directory '{}': {e}",
                    self.download_dir.display()
                ))
            })?;

        let mut reader = self
            .store
            .read_object(&self.bucket, key)
            .await
            .map_err(|e| match e {
                Error::NotFound(_) => Error::NotFound(format!("resource not found: '{key}'")),
                other => Error::Storage(format!(
                    "failed to read '{}/{key}': {other}",
                    self.bucket
                )),
            })?;

        let mut writer = tokio::fs::File::create(&target).await.map_err(|e| {
            Error::Io(format!(
                "failed to create '{}' for key '{key}': {e}",
                target.display()
            ))
        })?;

        let mut buf = [0u8; COPY_CHUNK_BYTES];
        loop {
            let n = reader.read(&mut buf).await.map_err(|e| {
                Error::Storage(format!("read failed for '{}/{key}': {e}", self.bucket))
            })?;
            if n == 0 {
                break;
            }
            writer.write_all(&buf[..n]).await.map_err(|e| {
                Error::Io(format!("write failed for '{}': {e}", target.display()))
            })?;
        }

        writer
            .flush()
            .await
            .map_err(|e| Error::Io(format!("flush failed for '{}': {e}", target.display())))?;

        tracing::info!(key = %key, target = %target.display(), "download complete");
        Ok(Download { local_path: target })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::ResourceKind;
    use crate::store::{MockObjectStore, ObjectMeta, RawObject, RawPage};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    fn service_with(store: MockObjectStore, dir: &std::path::Path) -> ResourceService {
        ResourceService::new(Arc::new(store), "test-bucket", dir)
    }

    fn raw_object(key: &str, size: i64) -> RawObject {
        RawObject {
            key: key.to_string(),
            size_bytes: size,
        }
    }

    #[tokio::test]
    async fn test_list_root_maps_prefixes_and_objects() {
        // Bucket contains {"a.txt", "docs/", "docs/b.txt"}; at the root the
        // store folds the "docs/" placeholder into a common prefix.
        let mut store = MockObjectStore::new();
        store
            .expect_list_page()
            .times(1)
            .withf(|bucket, query| {
                bucket == "test-bucket"
                    && query.prefix.is_empty()
                    && query.delimiter == "/"
                    && query.token.is_none()
            })
            .returning(|_, _| {
                Ok(RawPage {
                    common_prefixes: vec!["docs/".to_string()],
                    objects: vec![raw_object("a.txt", 3)],
                    next_token: None,
                })
            });

        let dir = tempfile::tempdir().unwrap();
        let service = service_with(store, dir.path());

        let page = service.list_folder(None, None).await.unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0], Resource::folder("docs/"));
        assert_eq!(page.items[0].name, "docs");
        assert_eq!(page.items[1], Resource::file("a.txt"));
        assert!(page.is_last());
    }

    #[tokio::test]
    async fn test_list_folder_excludes_placeholder_object() {
        // Listing inside "docs/" returns the placeholder object itself,
        // which must not appear as a file item.
        let mut store = MockObjectStore::new();
        store
            .expect_list_page()
            .times(1)
            .withf(|_, query| query.prefix == "docs/")
            .returning(|_, _| {
                Ok(RawPage {
                    common_prefixes: vec![],
                    objects: vec![raw_object("docs/", 0), raw_object("docs/b.txt", 7)],
                    next_token: None,
                })
            });

        let dir = tempfile::tempdir().unwrap();
        let service = service_with(store, dir.path());

        let parent = Resource::folder("docs/");
        let page = service.list_folder(Some(&parent), None).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, "docs/b.txt");
        assert_eq!(page.items[0].name, "b.txt");
        assert_eq!(page.items[0].kind, ResourceKind::File);
    }

    #[tokio::test]
    async fn test_list_folder_parent_without_slash_gets_one() {
        let mut store = MockObjectStore::new();
        store
            .expect_list_page()
            .times(1)
            .withf(|_, query| query.prefix == "docs/")
            .returning(|_, _| Ok(RawPage::default()));

        let dir = tempfile::tempdir().unwrap();
        let service = service_with(store, dir.path());

        // A folder synthesized elsewhere may lack the trailing separator
        let parent = Resource {
            id: "docs".to_string(),
            name: "docs".to_string(),
            kind: ResourceKind::Folder,
        };
        service.list_folder(Some(&parent), None).await.unwrap();
    }

    #[tokio::test]
    async fn test_list_folder_orders_folders_before_files() {
        let mut store = MockObjectStore::new();
        store.expect_list_page().times(1).returning(|_, _| {
            Ok(RawPage {
                common_prefixes: vec!["x/".to_string(), "a/".to_string()],
                objects: vec![raw_object("z.txt", 1), raw_object("b.txt", 1)],
                next_token: None,
            })
        });

        let dir = tempfile::tempdir().unwrap();
        let service = service_with(store, dir.path());

        // Store order is preserved within each group; no re-sorting
        let page = service.list_folder(None, None).await.unwrap();
        let ids: Vec<&str> = page.items.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["x/", "a/", "z.txt", "b.txt"]);
    }

    #[tokio::test]
    async fn test_list_folder_rejects_file_parent() {
        // No expectations set: any store call would panic the test
        let store = MockObjectStore::new();
        let dir = tempfile::tempdir().unwrap();
        let service = service_with(store, dir.path());

        let parent = Resource::file("a.txt");
        let err = service.list_folder(Some(&parent), None).await.unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_pagination_drives_to_completion() {
        let pages = Mutex::new(VecDeque::from([
            RawPage {
                common_prefixes: vec![],
                objects: vec![raw_object("a.txt", 1), raw_object("b.txt", 1)],
                next_token: Some("next-1".to_string()),
            },
            RawPage {
                common_prefixes: vec![],
                objects: vec![raw_object("c.txt", 1)],
                next_token: None,
            },
        ]));

        let mut store = MockObjectStore::new();
        store
            .expect_list_page()
            .times(2)
            .returning(move |_, _| Ok(pages.lock().unwrap().pop_front().unwrap()));

        let dir = tempfile::tempdir().unwrap();
        let service = service_with(store, dir.path());

        // The caller-owned loop from the pagination driver contract
        let mut items = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let page = service.list_folder(None, cursor.as_deref()).await.unwrap();
            items.extend(page.items);
            cursor = page.cursor;
            if cursor.is_none() {
                break;
            }
        }

        assert_eq!(items.len(), 3);
    }

    #[tokio::test]
    async fn test_pagination_passes_cursor_verbatim() {
        let mut store = MockObjectStore::new();
        store
            .expect_list_page()
            .times(1)
            .withf(|_, query| query.token.as_deref() == Some("opaque-token"))
            .returning(|_, _| Ok(RawPage::default()));

        let dir = tempfile::tempdir().unwrap();
        let service = service_with(store, dir.path());
        service.list_folder(None, Some("opaque-token")).await.unwrap();
    }

    #[tokio::test]
    async fn test_list_folder_wraps_store_error_with_context() {
        let mut store = MockObjectStore::new();
        store
            .expect_list_page()
            .returning(|_, _| Err(Error::Storage("connection reset".to_string())));

        let dir = tempfile::tempdir().unwrap();
        let service = service_with(store, dir.path());

        let err = service.list_folder(None, None).await.unwrap_err();
        match err {
            Error::Storage(msg) => {
                assert!(msg.contains("test-bucket"));
                assert!(msg.contains("connection reset"));
            }
            other => panic!("expected Storage, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_resource_file_and_folder_kinds() {
        let mut store = MockObjectStore::new();
        store
            .expect_head_object()
            .times(2)
            .returning(|_, key| Ok(ObjectMeta::new(key, 42)));

        let dir = tempfile::tempdir().unwrap();
        let service = service_with(store, dir.path());

        let file = service.get_resource("docs/b.txt").await.unwrap();
        assert_eq!(file.kind, ResourceKind::File);
        assert_eq!(file.name, "b.txt");

        let folder = service.get_resource("docs/").await.unwrap();
        assert_eq!(folder.kind, ResourceKind::Folder);
        assert_eq!(folder.name, "docs");
    }

    #[tokio::test]
    async fn test_get_resource_not_found_is_distinct() {
        let mut store = MockObjectStore::new();
        store
            .expect_head_object()
            .withf(|_, key| key == "missing.txt")
            .returning(|_, key| Err(Error::NotFound(key.to_string())));
        store
            .expect_head_object()
            .withf(|_, key| key == "slow.txt")
            .returning(|_, _| Err(Error::Storage("connection timed out".to_string())));

        let dir = tempfile::tempdir().unwrap();
        let service = service_with(store, dir.path());

        let err = service.get_resource("missing.txt").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));

        let err = service.get_resource("slow.txt").await.unwrap_err();
        assert!(matches!(err, Error::Storage(_)));
    }

    #[tokio::test]
    async fn test_get_as_file_rejects_folder_without_store_call() {
        // No expectations set: any store call would panic the test
        let store = MockObjectStore::new();
        let dir = tempfile::tempdir().unwrap();
        let service = service_with(store, dir.path());

        let folder = Resource::folder("some-folder/");
        let err = service.get_as_file(&folder).await.unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_get_as_file_round_trip() {
        // Content larger than one copy chunk, so the loop runs several times
        let data: Vec<u8> = (0..40_000).map(|i| (i % 251) as u8).collect();
        let served = data.clone();

        let mut store = MockObjectStore::new();
        store
            .expect_read_object()
            .times(1)
            .withf(|bucket, key| bucket == "test-bucket" && key == "nested/file.bin")
            .returning(move |_, _| {
                Ok(Box::new(std::io::Cursor::new(served.clone())) as crate::store::ObjectReader)
            });

        let dir = tempfile::tempdir().unwrap();
        let service = service_with(store, dir.path());

        let resource = Resource::file("nested/file.bin");
        let download = service.get_as_file(&resource).await.unwrap();

        assert_eq!(download.local_path, dir.path().join("file.bin"));
        let written = std::fs::read(&download.local_path).unwrap();
        assert_eq!(written, data);
    }

    #[tokio::test]
    async fn test_get_as_file_overwrites_existing() {
        let mut store = MockObjectStore::new();
        store.expect_read_object().returning(|_, _| {
            Ok(Box::new(std::io::Cursor::new(b"fresh".to_vec())) as crate::store::ObjectReader)
        });

        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("file.txt"), b"stale contents, longer").unwrap();

        let service = service_with(store, dir.path());
        let download = service.get_as_file(&Resource::file("file.txt")).await.unwrap();

        let written = std::fs::read(&download.local_path).unwrap();
        assert_eq!(written, b"fresh");
    }

    #[tokio::test]
    async fn test_get_as_file_missing_key_is_not_found() {
        let mut store = MockObjectStore::new();
        store
            .expect_read_object()
            .returning(|_, key| Err(Error::NotFound(key.to_string())));

        let dir = tempfile::tempdir().unwrap();
        let service = service_with(store, dir.path());

        let err = service
            .get_as_file(&Resource::file("gone.txt"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_get_as_file_creates_download_dir() {
        let mut store = MockObjectStore::new();
        store.expect_read_object().returning(|_, _| {
            Ok(Box::new(std::io::Cursor::new(b"x".to_vec())) as crate::store::ObjectReader)
        });

        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let service = ResourceService::new(Arc::new(store), "test-bucket", &nested);

        let download = service.get_as_file(&Resource::file("x.txt")).await.unwrap();
        assert!(download.local_path.starts_with(&nested));
        assert!(download.local_path.exists());
    }
}
