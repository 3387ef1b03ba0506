//! get command - Retrieve and download one object
//!
//! The one-shot flow: fetch the resource's metadata, then, if it is a file,
//! stream its content into the configured download directory. A folder key
//! is reported and skipped. The key defaults to `storage.object_key` from
//! the config so the flow can run unattended.

use clap::Args;
use serde::Serialize;

use crate::commands::GlobalArgs;
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Download an object by key
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Object key (defaults to 'storage.object_key' from the config)
    pub key: Option<String>,
}

#[derive(Debug, Serialize)]
struct GetOutput {
    key: String,
    name: String,
    local_path: String,
}

/// Execute the get command
pub async fn execute(args: GetArgs, globals: &GlobalArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let session = match crate::commands::connect(globals).await {
        Ok(s) => s,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::from_error(&e);
        }
    };

    let key = match args.key.or_else(|| session.config.storage.object_key.clone()) {
        Some(k) => k,
        None => {
            formatter.error("no key given and no 'object_key' in the config");
            return ExitCode::UsageError;
        }
    };

    let resource = match session.service.get_resource(&key).await {
        Ok(r) => r,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::from_error(&e);
        }
    };

    if resource.is_folder() {
        formatter.println(&format!("'{}' is a folder, skipping download", resource.id));
        return ExitCode::Success;
    }

    match session.service.get_as_file(&resource).await {
        Ok(download) => {
            if formatter.is_json() {
                formatter.json(&GetOutput {
                    key: resource.id.clone(),
                    name: resource.name.clone(),
                    local_path: download.local_path.display().to_string(),
                });
            } else {
                formatter.success(&format!(
                    "{} -> {}",
                    resource.id,
                    download.local_path.display()
                ));
            }
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&e.to_string());
            ExitCode::from_error(&e)
        }
    }
}
