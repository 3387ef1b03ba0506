//! ls command - List one folder level
//!
//! Lists the bucket root or a folder prefix, driving the pagination loop to
//! completion: start with no cursor, pass each page's cursor back verbatim,
//! stop when the store returns none.

use clap::Args;
use serde::Serialize;

use bb_core::{Resource, keys};

use crate::commands::GlobalArgs;
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// List folders and files under a prefix
#[derive(Args, Debug)]
pub struct LsArgs {
    /// Folder prefix to list (bucket root if omitted)
    pub prefix: Option<String>,

    /// Summarize output (show totals)
    #[arg(long)]
    pub summarize: bool,
}

/// Output structure for ls command (JSON format)
#[derive(Debug, Serialize)]
struct LsOutput {
    items: Vec<Resource>,
    pages: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<Summary>,
}

#[derive(Debug, Serialize)]
struct Summary {
    folders: usize,
    files: usize,
}

/// Execute the ls command
pub async fn execute(args: LsArgs, globals: &GlobalArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let session = match crate::commands::connect(globals).await {
        Ok(s) => s,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::from_error(&e);
        }
    };

    let parent = args.prefix.as_deref().map(parent_folder);

    let mut all_items = Vec::new();
    let mut pages = 0usize;
    let mut cursor: Option<String> = None;

    // Paginate through all results
    loop {
        let page = match session
            .service
            .list_folder(parent.as_ref(), cursor.as_deref())
            .await
        {
            Ok(p) => p,
            Err(e) => {
                formatter.error(&e.to_string());
                return ExitCode::from_error(&e);
            }
        };
        pages += 1;

        if formatter.is_json() {
            all_items.extend(page.items);
        } else {
            for item in &page.items {
                let label = if item.is_folder() { "DIR " } else { "FILE" };
                formatter.println(&format!("[{label}] {}", item.id));
            }
            all_items.extend(page.items);
        }

        cursor = page.cursor;
        if cursor.is_none() {
            break;
        }
    }

    let folders = all_items.iter().filter(|i| i.is_folder()).count();
    let files = all_items.len() - folders;

    if formatter.is_json() {
        let output = LsOutput {
            items: all_items,
            pages,
            summary: args.summarize.then_some(Summary { folders, files }),
        };
        formatter.json(&output);
    } else if args.summarize {
        formatter.println(&format!(
            "\nTotal: {folders} folder(s), {files} file(s) across {pages} page(s)"
        ));
    }

    ExitCode::Success
}

/// Normalize a user-supplied prefix into a folder resource
fn parent_folder(prefix: &str) -> Resource {
    Resource::folder(keys::ensure_trailing_slash(prefix))
}
