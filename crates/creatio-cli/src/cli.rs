//! CLI argument definitions.

use clap::{Parser, Subcommand};

use crate::commands;

/// Creatio OData collection tool.
#[derive(Parser, Debug)]
#[command(name = "creatio")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and store the session for later commands
    Login(commands::login::LoginArgs),

    /// Discard the stored session
    Logout(commands::logout::LogoutArgs),

    /// Fetch a collection, a single record, or a filtered subset
    Get(commands::get::GetArgs),

    /// Create a record in a collection
    Create(commands::create::CreateArgs),

    /// Apply a partial update to a record
    Update(commands::update::UpdateArgs),

    /// Delete a record
    Delete(commands::delete::DeleteArgs),

    /// Download a file attachment
    Download(commands::download::DownloadArgs),

    /// Upload a file attachment
    Upload(commands::upload::UploadArgs),
}
