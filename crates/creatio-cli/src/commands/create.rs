//! Create command implementation.

use std::io::{self, Read};

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;

use crate::commands::print_response;
use crate::{config, output, session};

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Collection name (e.g. Case)
    pub collection: String,

    /// JSON file with the record fields (use - for stdin)
    #[arg(long)]
    pub json: String,

    /// Instance base URL (defaults to $CREATIO_URL)
    #[arg(long)]
    pub url: Option<String>,
}

pub async fn run(args: CreateArgs) -> Result<()> {
    let url = config::resolve_url(args.url.as_deref())?;
    let mut client = session::connected_client(url)?;

    let data = read_json(&args.json)?;

    let response = client
        .add_collection_data(&args.collection, &data)
        .await
        .context("Failed to create record")?;

    if response.is_success()
        && let Some(id) = response.record_id()
    {
        output::success(&format!("Created {}({})", args.collection, id));
    }
    print_response(&response)
}

/// Read a JSON object from a file path or stdin (`-`).
pub fn read_json(source: &str) -> Result<Value> {
    let content = if source == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read from stdin")?;
        buf
    } else {
        std::fs::read_to_string(source).context("Failed to read JSON file")?
    };

    serde_json::from_str(&content).context("Invalid JSON input")
}
