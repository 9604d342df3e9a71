//! Error types for the Creatio client.
//!
//! The taxonomy deliberately mirrors the library's contract: configuration
//! and precondition violations are errors, transport faults are errors, but
//! HTTP-level rejections from the platform are *not* errors. Those come
//! back to the caller as ordinary responses to inspect.

use thiserror::Error;

/// The unified error type for Creatio client operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration errors (missing credentials, invalid base URL or input).
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Authentication errors (unauthenticated calls, rejected logins).
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Network transport errors (DNS, TLS, connection, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// A response body could not be decoded as requested.
    #[error("invalid response body: {message}")]
    InvalidBody { message: String },
}

/// Configuration and input validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No credentials were passed and none were configured.
    #[error("no credentials provided and none configured")]
    MissingCredentials,

    /// The base URL is missing or malformed.
    #[error("invalid service URL '{value}': {reason}")]
    ServiceUrl { value: String, reason: String },

    /// A record identifier that cannot appear in a collection path.
    #[error("invalid record id '{value}': {reason}")]
    RecordId { value: String, reason: String },

    /// Generic invalid input (file names, header values, ...).
    #[error("invalid input: {message}")]
    Input { message: String },
}

/// Authentication-related errors.
///
/// These cover precondition violations and logins the platform rejected in
/// a way that leaves the session unusable. An HTTP non-200 on the login
/// call itself is not in this set; it is handed back as a response.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A data call was attempted before a successful login.
    #[error("authentication required: call authenticate() first")]
    AuthenticationRequired,

    /// The platform answered HTTP 200 but the body carried an exception.
    #[error("login rejected by the platform: {message}")]
    LoginRejected { message: String },

    /// The login looked successful but the anti-forgery cookie was absent,
    /// so no mutating request could ever be issued on this session.
    #[error("login response did not set the anti-forgery cookie")]
    MissingCsrfCookie,
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Request construction or protocol plumbing failed.
    #[error("HTTP error: {message}")]
    Http { message: String },
}
