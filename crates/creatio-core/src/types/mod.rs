//! Core Creatio types.
//!
//! These types enforce the platform's path and URL invariants at
//! construction time, so invalid requests cannot be built.

mod record_id;
mod service_url;

pub use record_id::RecordId;
pub use service_url::{LOGIN_PATH, ODATA_ROOT, REST_ROOT, ServiceUrl};
