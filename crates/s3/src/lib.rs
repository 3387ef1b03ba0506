//! bb-s3: S3 SDK adapter for the bb bucket browser
//!
//! This crate provides the implementation of the ObjectStore trait using
//! aws-sdk-s3, plus the credential resolvers. It is the only crate that
//! directly depends on the AWS SDK.

pub mod client;
pub mod credentials;

pub use client::S3Store;
pub use credentials::{ConfigCredentialsResolver, CredentialsResolver, DefaultChainResolver};
