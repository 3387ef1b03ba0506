//! Credential resolution
//!
//! The service never resolves credentials itself; the CLI picks one of the
//! resolvers below, resolves eagerly at startup, and hands the resolved
//! value to the store at construction. Resolution either produces usable
//! credentials or fails with `Error::Auth` before any store operation runs.

use async_trait::async_trait;
use aws_credential_types::Credentials;
use aws_credential_types::provider::ProvideCredentials;

use bb_core::{Config, Error, Result};

/// Capability trait: resolve credentials or fail.
#[async_trait]
pub trait CredentialsResolver: Send + Sync {
    async fn resolve(&self) -> Result<Credentials>;
}

/// Resolves through the AWS default provider chain: environment variables,
/// shared config/credentials files, then instance metadata.
pub struct DefaultChainResolver {
    region: String,
}

impl DefaultChainResolver {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
        }
    }
}

#[async_trait]
impl CredentialsResolver for DefaultChainResolver {
    async fn resolve(&self) -> Result<Credentials> {
        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(self.region.clone()))
            .load()
            .await;

        let provider = sdk_config
            .credentials_provider()
            .ok_or_else(|| Error::Auth("no credentials provider in the default chain".into()))?;

        provider
            .provide_credentials()
            .await
            .map_err(|e| Error::Auth(format!("default credentials chain failed: {e}")))
    }
}

/// Resolves static credentials from the `[credentials]` section of the
/// config file.
pub struct ConfigCredentialsResolver {
    credentials: Option<bb_core::CredentialsConfig>,
    origin: String,
}

impl ConfigCredentialsResolver {
    /// Build from a loaded config; `origin` names the file for error messages.
    pub fn from_config(config: &Config, origin: impl Into<String>) -> Self {
        Self {
            credentials: config.credentials.clone(),
            origin: origin.into(),
        }
    }
}

#[async_trait]
impl CredentialsResolver for ConfigCredentialsResolver {
    async fn resolve(&self) -> Result<Credentials> {
        let creds = self.credentials.as_ref().ok_or_else(|| {
            Error::Auth(format!("missing [credentials] section in {}", self.origin))
        })?;

        if creds.access_key.is_empty() || creds.secret_key.is_empty() {
            return Err(Error::Auth(format!(
                "missing 'access_key' or 'secret_key' in {}",
                self.origin
            )));
        }

        Ok(Credentials::new(
            creds.access_key.clone(),
            creds.secret_key.clone(),
            None, // session token
            None, // expiry
            "bb-config-credentials",
        ))
    }
}
