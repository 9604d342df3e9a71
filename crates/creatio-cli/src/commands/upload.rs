//! Upload command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use creatio_core::RecordId;

use crate::commands::print_response;
use crate::{config, output, session};

#[derive(Args, Debug)]
pub struct UploadArgs {
    /// Attachment collection name (e.g. CaseFile)
    pub collection: String,

    /// Record id of the entity to attach the file to
    #[arg(long)]
    pub id: String,

    /// Path of the file to upload
    pub file: PathBuf,

    /// MIME type of the file content
    #[arg(long)]
    pub mime: Option<String>,

    /// Instance base URL (defaults to $CREATIO_URL)
    #[arg(long)]
    pub url: Option<String>,
}

pub async fn run(args: UploadArgs) -> Result<()> {
    let url = config::resolve_url(args.url.as_deref())?;
    let mut client = session::connected_client(url)?;

    let entity_id = RecordId::new(&args.id).context("Invalid record id")?;

    let file_name = args
        .file
        .file_name()
        .and_then(|n| n.to_str())
        .context("File path has no usable file name")?
        .to_string();
    let data = std::fs::read(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let size = data.len();

    let response = client
        .upload_file(
            &args.collection,
            &entity_id,
            &file_name,
            args.mime.as_deref(),
            data,
        )
        .await
        .context("Failed to upload file")?;

    if response.is_success() {
        output::success(&format!("Uploaded {file_name} ({size} bytes)"));
        return Ok(());
    }
    print_response(&response)
}
