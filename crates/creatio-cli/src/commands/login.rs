//! Login command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use creatio_odata::{ClientConfig, SessionClient};

use crate::{config, output, session};

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Username (defaults to $CREATIO_USERNAME)
    #[arg(long)]
    pub username: Option<String>,

    /// Password (defaults to $CREATIO_PASSWORD)
    #[arg(long)]
    pub password: Option<String>,

    /// Instance base URL (defaults to $CREATIO_URL)
    #[arg(long)]
    pub url: Option<String>,
}

pub async fn run(args: LoginArgs) -> Result<()> {
    let url = config::resolve_url(args.url.as_deref())?;
    let credentials =
        config::resolve_credentials(args.username.as_deref(), args.password.as_deref())?;
    let username = credentials.username().to_string();

    eprintln!("{}", "Logging in...".dimmed());

    let client_config = ClientConfig::new(url.clone()).credentials(credentials);
    let mut client = SessionClient::new(client_config)?;
    let response = client.authenticate(None).await.context("Failed to login")?;

    if !client.is_authenticated() {
        output::error(&format!("HTTP {}", response.status()));
        anyhow::bail!("login failed with HTTP {}", response.status());
    }

    // Save session so later commands skip the login round-trip
    session::save_session(&url, &username, &client.session())
        .context("Failed to save session")?;

    output::success("Logged in successfully");
    println!();
    output::field("URL", url.as_str());
    output::field("User", &username);

    Ok(())
}
