//! Delete command implementation.

use anyhow::{Context, Result};
use clap::Args;

use creatio_core::RecordId;

use crate::commands::print_response;
use crate::{config, output, session};

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Collection name (e.g. Case)
    pub collection: String,

    /// Record id to delete
    #[arg(long)]
    pub id: String,

    /// Instance base URL (defaults to $CREATIO_URL)
    #[arg(long)]
    pub url: Option<String>,
}

pub async fn run(args: DeleteArgs) -> Result<()> {
    let url = config::resolve_url(args.url.as_deref())?;
    let mut client = session::connected_client(url)?;

    let record_id = RecordId::new(&args.id).context("Invalid record id")?;

    let response = client
        .delete_collection_data(&args.collection, &record_id)
        .await
        .context("Failed to delete record")?;

    if response.is_success() {
        output::success(&format!("Deleted {}({})", args.collection, record_id));
        return Ok(());
    }
    print_response(&response)
}
