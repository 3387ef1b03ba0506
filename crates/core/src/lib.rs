//! bb-core: Core library for the bb bucket browser
//!
//! This crate provides the core functionality for the bb CLI, including:
//! - The resource model (files, folders, listing pages)
//! - Key-path helpers for the flat key namespace
//! - The ObjectStore trait the service consumes
//! - The listing/retrieval service itself
//! - Configuration management
//!
//! This crate is designed to be independent of any specific S3 SDK,
//! allowing the service to be tested against a substitute store.

pub mod config;
pub mod error;
pub mod keys;
pub mod resource;
pub mod service;
pub mod store;

pub use config::{Config, ConfigManager, CredentialsConfig, StorageConfig};
pub use error::{Error, Result};
pub use resource::{Download, Page, Resource, ResourceKind};
pub use service::ResourceService;
pub use store::{ListQuery, ObjectMeta, ObjectReader, ObjectStore, RawObject, RawPage};
