//! Environment boundary.
//!
//! The only place in the workspace that reads process environment
//! variables. Everything below this layer takes explicit configuration.

use anyhow::{Context, Result};

use creatio_core::{Credentials, ServiceUrl};

/// Environment variable holding the instance base URL.
pub const ENV_URL: &str = "CREATIO_URL";
/// Environment variable holding the default username.
pub const ENV_USERNAME: &str = "CREATIO_USERNAME";
/// Environment variable holding the default password.
pub const ENV_PASSWORD: &str = "CREATIO_PASSWORD";

/// Resolve the instance URL from a flag or `CREATIO_URL`.
pub fn resolve_url(flag: Option<&str>) -> Result<ServiceUrl> {
    let raw = match flag {
        Some(url) => url.to_string(),
        None => std::env::var(ENV_URL)
            .with_context(|| format!("no --url given and {ENV_URL} is not set"))?,
    };
    ServiceUrl::new(&raw).context("Invalid Creatio URL")
}

/// Resolve credentials from flags or the environment.
///
/// Flags win over the environment; both values must resolve.
pub fn resolve_credentials(
    username_flag: Option<&str>,
    password_flag: Option<&str>,
) -> Result<Credentials> {
    let username = match username_flag {
        Some(u) => u.to_string(),
        None => std::env::var(ENV_USERNAME)
            .with_context(|| format!("no --username given and {ENV_USERNAME} is not set"))?,
    };
    let password = match password_flag {
        Some(p) => p.to_string(),
        None => std::env::var(ENV_PASSWORD)
            .with_context(|| format!("no --password given and {ENV_PASSWORD} is not set"))?,
    };

    if username.is_empty() || password.is_empty() {
        anyhow::bail!("username and password must not be empty");
    }

    Ok(Credentials::new(username, password))
}
