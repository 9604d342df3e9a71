//! creatio-odata - Session-based HTTP client for the Creatio OData API.
//!
//! The entry point is [`SessionClient`]: construct it with a
//! [`ClientConfig`], call [`SessionClient::authenticate`], then use the
//! collection and file operations. Non-2xx statuses come back as
//! [`ApiResponse`] values rather than errors; see the client docs for the
//! contract.

pub mod client;
pub mod endpoints;
pub mod files;
pub mod query;
pub mod response;

pub use client::{ClientConfig, SessionClient, SessionState};
pub use files::attachment_filename;
pub use query::QueryOptions;
pub use response::{ApiResponse, RemoteError};

// Re-exported so callers can name verbs and statuses without depending on
// reqwest directly.
pub use reqwest::{Method, StatusCode};
