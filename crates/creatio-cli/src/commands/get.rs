//! Get command implementation.

use anyhow::{Context, Result};
use clap::Args;

use creatio_core::RecordId;
use creatio_odata::QueryOptions;

use crate::commands::print_response;
use crate::{config, session};

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Collection name (e.g. Case)
    pub collection: String,

    /// Record id for a single-record fetch
    #[arg(long)]
    pub id: Option<String>,

    /// Instance base URL (defaults to $CREATIO_URL)
    #[arg(long)]
    pub url: Option<String>,

    /// Limit the number of records ($top)
    #[arg(long)]
    pub top: Option<u32>,

    /// Skip the first N records ($skip)
    #[arg(long)]
    pub skip: Option<u32>,

    /// Include the total count of matching records ($count)
    #[arg(long)]
    pub count: bool,

    /// Comma-separated field list ($select)
    #[arg(long)]
    pub select: Option<String>,

    /// Comma-separated related entities ($expand)
    #[arg(long)]
    pub expand: Option<String>,

    /// Ordering expression ($orderby), e.g. "CreatedOn desc"
    #[arg(long)]
    pub order_by: Option<String>,

    /// Filter expression ($filter), e.g. "StatusId ne null"
    #[arg(long)]
    pub filter: Option<String>,
}

pub async fn run(args: GetArgs) -> Result<()> {
    let url = config::resolve_url(args.url.as_deref())?;
    let mut client = session::connected_client(url)?;

    let record_id = args
        .id
        .as_deref()
        .map(RecordId::new)
        .transpose()
        .context("Invalid record id")?;

    let mut options = QueryOptions::new();
    if let Some(top) = args.top {
        options = options.top(top);
    }
    if let Some(skip) = args.skip {
        options = options.skip(skip);
    }
    if args.count {
        options = options.count(true);
    }
    if let Some(ref select) = args.select {
        options = options.select(select.split(',').map(str::trim));
    }
    if let Some(ref expand) = args.expand {
        options = options.expand(expand.split(',').map(str::trim));
    }
    if let Some(ref order_by) = args.order_by {
        options = options.order_by(order_by.as_str());
    }
    if let Some(ref filter) = args.filter {
        options = options.filter(filter.as_str());
    }

    let response = client
        .get_collection_data(&args.collection, record_id.as_ref(), &options)
        .await
        .context("Failed to fetch collection data")?;

    if response.is_not_found() {
        anyhow::bail!("record not found");
    }

    print_response(&response)
}
