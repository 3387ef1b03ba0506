//! Resource model
//!
//! A `Resource` describes a single listed item, file or folder, derived from
//! an object key. `Page` is the envelope one listing call returns: the items
//! plus an optional continuation cursor.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::keys;

/// Whether a resource is a file (a literal object) or a folder (a key
/// prefix, synthesized from the store's common-prefix grouping or a
/// trailing-separator key).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    File,
    Folder,
}

/// A single listed item in the bucket.
///
/// `id` is the full object key; `name` is the last path segment with any
/// trailing separator stripped. Immutable after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// The full storage key
    pub id: String,

    /// Display name derived from the key
    pub name: String,

    /// File or folder
    pub kind: ResourceKind,
}

impl Resource {
    /// Create a file resource from an object key
    pub fn file(id: impl Into<String>) -> Self {
        let id = id.into();
        let name = keys::display_name(&id).to_string();
        Self {
            id,
            name,
            kind: ResourceKind::File,
        }
    }

    /// Create a folder resource from a prefix key
    pub fn folder(id: impl Into<String>) -> Self {
        let id = id.into();
        let name = keys::display_name(&id).to_string();
        Self {
            id,
            name,
            kind: ResourceKind::Folder,
        }
    }

    /// Create a resource from a bare key, inferring the kind structurally:
    /// a trailing separator means folder, anything else is a file.
    pub fn from_key(id: impl Into<String>) -> Self {
        let id = id.into();
        if id.ends_with(keys::SEPARATOR) {
            Self::folder(id)
        } else {
            Self::file(id)
        }
    }

    /// Whether this resource is a folder
    pub fn is_folder(&self) -> bool {
        self.kind == ResourceKind::Folder
    }

    /// Whether this resource is a file
    pub fn is_file(&self) -> bool {
        self.kind == ResourceKind::File
    }
}

/// One page of a listing.
///
/// `cursor == None` signals the final page; a `Some` cursor must be passed
/// verbatim to the next listing call for the same prefix to continue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// Listed items, in store order
    pub items: Vec<T>,

    /// Continuation cursor for the next page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

impl<T> Page<T> {
    /// Whether this is the final page
    pub fn is_last(&self) -> bool {
        self.cursor.is_none()
    }
}

/// Reference to a completed download on the local filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    /// Where the file was written
    pub local_path: PathBuf,
}
