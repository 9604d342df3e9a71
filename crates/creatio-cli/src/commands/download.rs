//! Download command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use creatio_core::RecordId;
use creatio_odata::attachment_filename;

use crate::commands::print_response;
use crate::{config, output, session};

#[derive(Args, Debug)]
pub struct DownloadArgs {
    /// Attachment collection name (e.g. CaseFile)
    pub collection: String,

    /// File record id to download
    #[arg(long)]
    pub id: String,

    /// Directory to save the file into (defaults to the current directory)
    #[arg(long, default_value = ".")]
    pub out: PathBuf,

    /// Instance base URL (defaults to $CREATIO_URL)
    #[arg(long)]
    pub url: Option<String>,
}

pub async fn run(args: DownloadArgs) -> Result<()> {
    let url = config::resolve_url(args.url.as_deref())?;
    let mut client = session::connected_client(url)?;

    let file_id = RecordId::new(&args.id).context("Invalid file id")?;

    let response = client
        .download_file(&args.collection, &file_id)
        .await
        .context("Failed to download file")?;

    if !response.is_success() {
        return print_response(&response);
    }

    let file_name = attachment_filename(&response)
        .context("Could not determine the file name from the response headers")?;
    let target = args.out.join(&file_name);
    std::fs::write(&target, response.body())
        .with_context(|| format!("Failed to write {}", target.display()))?;

    output::success(&format!(
        "Saved {} ({} bytes)",
        target.display(),
        response.body().len()
    ));
    Ok(())
}
