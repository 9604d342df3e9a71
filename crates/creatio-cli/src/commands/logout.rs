//! Logout command implementation.

use anyhow::Result;
use clap::Args;

use crate::{output, session};

#[derive(Args, Debug)]
pub struct LogoutArgs {}

pub async fn run(_args: LogoutArgs) -> Result<()> {
    session::clear_session()?;
    output::success("Session cleared");
    Ok(())
}
