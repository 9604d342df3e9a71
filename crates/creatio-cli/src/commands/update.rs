//! Update command implementation.

use anyhow::{Context, Result};
use clap::Args;

use creatio_core::RecordId;

use crate::commands::{create::read_json, print_response};
use crate::{config, output, session};

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Collection name (e.g. Case)
    pub collection: String,

    /// Record id to update
    #[arg(long)]
    pub id: String,

    /// JSON file with the changed fields (use - for stdin)
    #[arg(long)]
    pub json: String,

    /// Instance base URL (defaults to $CREATIO_URL)
    #[arg(long)]
    pub url: Option<String>,
}

pub async fn run(args: UpdateArgs) -> Result<()> {
    let url = config::resolve_url(args.url.as_deref())?;
    let mut client = session::connected_client(url)?;

    let record_id = RecordId::new(&args.id).context("Invalid record id")?;
    let data = read_json(&args.json)?;

    let response = client
        .modify_collection_data(&args.collection, &record_id, &data)
        .await
        .context("Failed to update record")?;

    if response.is_success() {
        output::success(&format!("Updated {}({})", args.collection, record_id));
        return Ok(());
    }
    print_response(&response)
}
