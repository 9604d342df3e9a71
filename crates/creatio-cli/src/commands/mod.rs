//! Command implementations.

pub mod create;
pub mod delete;
pub mod download;
pub mod get;
pub mod login;
pub mod logout;
pub mod update;
pub mod upload;

use anyhow::Result;

use creatio_odata::ApiResponse;

use crate::output;

/// Render a service response: pretty JSON for successful bodies, status
/// plus body text otherwise. Non-2xx statuses terminate the command with a
/// nonzero exit, but are never Rust errors inside the library.
pub fn print_response(response: &ApiResponse) -> Result<()> {
    if response.is_success() {
        if let Some(body) = response.json_opt() {
            output::json_pretty(&body)?;
        } else {
            let text = response.text();
            if text.is_empty() {
                output::success(&format!("HTTP {}", response.status()));
            } else {
                println!("{}", text);
            }
        }
        return Ok(());
    }

    output::error(&format!("HTTP {}", response.status()));
    let text = response.text();
    if !text.is_empty() {
        eprintln!("{}", text);
    }
    anyhow::bail!("request failed with HTTP {}", response.status())
}
