//! creatio-core - Core types and errors for the Creatio OData client.

pub mod credentials;
pub mod error;
pub mod types;

pub use credentials::Credentials;
pub use error::{AuthError, ConfigError, Error, TransportError};
pub use types::{LOGIN_PATH, ODATA_ROOT, REST_ROOT, RecordId, ServiceUrl};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
