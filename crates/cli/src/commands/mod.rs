//! CLI command definitions and execution
//!
//! Commands follow the pattern of an Args struct plus an `execute` function
//! returning an ExitCode. Connection setup (config, credentials, store,
//! service) is shared; each command owns its own output.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};

use bb_core::{Config, ConfigManager, ResourceService, Result};
use bb_s3::{ConfigCredentialsResolver, CredentialsResolver, DefaultChainResolver, S3Store};

use crate::exit_code::ExitCode;
use crate::output::OutputConfig;

mod get;
mod ls;
mod stat;

/// bb - bucket browser
///
/// Browse and retrieve objects from an S3-compatible bucket configured in
/// ~/.config/bb/config.toml.
#[derive(Parser, Debug)]
#[command(name = "bb")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the config file (defaults to ~/.config/bb/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Where credentials come from
    #[arg(long, global = true, value_enum, default_value = "env")]
    pub credentials: CredentialMode,

    /// Output format: human-readable or JSON
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true, default_value = "false")]
    pub no_color: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, default_value = "false")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Credential acquisition mode
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialMode {
    /// Default AWS chain: environment, shared profile, instance metadata
    Env,
    /// Static keys from the [credentials] section of the config file
    File,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List one folder level, driving pagination to completion
    Ls(ls::LsArgs),

    /// Show a single resource by key
    Stat(stat::StatArgs),

    /// Download a file resource into the configured directory
    Get(get::GetArgs),
}

/// Global options every command needs for connection setup
#[derive(Debug, Clone)]
pub(crate) struct GlobalArgs {
    pub config: Option<PathBuf>,
    pub credentials: CredentialMode,
}

/// A connected session: the service plus the config it was built from
pub(crate) struct Session {
    pub service: ResourceService,
    pub config: Config,
}

/// Load config, resolve credentials eagerly, and build the service.
///
/// Credential resolution happens here, once, before any store operation is
/// attempted; a failure aborts the command with an auth error.
pub(crate) async fn connect(globals: &GlobalArgs) -> Result<Session> {
    let manager = match &globals.config {
        Some(path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new()?,
    };
    let config = manager.load()?;

    let resolver: Box<dyn CredentialsResolver> = match globals.credentials {
        CredentialMode::File => Box::new(ConfigCredentialsResolver::from_config(
            &config,
            manager.config_path().display().to_string(),
        )),
        CredentialMode::Env => Box::new(DefaultChainResolver::new(config.storage.region.as_str())),
    };

    let credentials = resolver.resolve().await?;

    let store = S3Store::new(
        credentials,
        config.storage.region.as_str(),
        config.storage.endpoint.as_deref(),
    )
    .await;

    let service = ResourceService::new(
        Arc::new(store),
        config.storage.bucket.clone(),
        config.storage.download_dir.clone(),
    );

    Ok(Session { service, config })
}

/// Execute the CLI command and return an exit code
pub async fn execute(cli: Cli) -> ExitCode {
    let output_config = OutputConfig {
        json: cli.json,
        no_color: cli.no_color,
        quiet: cli.quiet,
    };

    let globals = GlobalArgs {
        config: cli.config,
        credentials: cli.credentials,
    };

    match cli.command {
        Commands::Ls(args) => ls::execute(args, &globals, output_config).await,
        Commands::Stat(args) => stat::execute(args, &globals, output_config).await,
        Commands::Get(args) => get::execute(args, &globals, output_config).await,
    }
}
