//! stat command - Show a single resource
//!
//! Fetches a resource by exact key and prints its derived identity. The
//! kind is inferred structurally from the key, not from the store.

use clap::Args;

use bb_core::ResourceKind;

use crate::commands::GlobalArgs;
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Show a resource by key
#[derive(Args, Debug)]
pub struct StatArgs {
    /// Object key
    pub key: String,
}

/// Execute the stat command
pub async fn execute(args: StatArgs, globals: &GlobalArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let session = match crate::commands::connect(globals).await {
        Ok(s) => s,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::from_error(&e);
        }
    };

    match session.service.get_resource(&args.key).await {
        Ok(resource) => {
            if formatter.is_json() {
                formatter.json(&resource);
            } else {
                let kind = match resource.kind {
                    ResourceKind::File => "file",
                    ResourceKind::Folder => "folder",
                };
                formatter.println(&format!("Key  : {}", resource.id));
                formatter.println(&format!("Name : {}", resource.name));
                formatter.println(&format!("Kind : {kind}"));
            }
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&e.to_string());
            ExitCode::from_error(&e)
        }
    }
}
