//! Wire-level constants and login payload types.
//!
//! Everything in this module is a fixed contractual value of the Creatio
//! platform: endpoint paths, header and cookie names, and the shape of the
//! login exchange. None of it is derived or configurable.

use reqwest::header::HeaderName;
use serde::{Deserialize, Serialize};

use creatio_core::RecordId;

/// Name of the session cookie carrying the anti-forgery token.
///
/// Cookie names are case-sensitive; this one is sent by the platform in
/// upper case.
pub const CSRF_COOKIE: &str = "BPMCSRF";

/// Header under which mutating requests echo the anti-forgery token.
/// Header names are case-insensitive on the wire.
pub const CSRF_HEADER: HeaderName = HeaderName::from_static("bpmcsrf");

/// Header that forces cookie-session handling on the platform side.
pub const FORCE_USE_SESSION_HEADER: HeaderName = HeaderName::from_static("forceusesession");

/// Accept header for OData endpoints (everything except `$metadata`).
pub const ODATA_ACCEPT: &str = "application/json; odata=verbose";

/// Path segment that marks a metadata request.
pub const METADATA_SEGMENT: &str = "$metadata";

/// REST path of the chunked file upload service.
pub const FILE_UPLOAD_PATH: &str = "FileApiService/UploadFile";

/// `TypeId` value the platform expects on attachment records.
pub const ATTACHMENT_TYPE_ID: &str = "529bc2f8-0ee0-df11-971b-001d60e938c6";

/// REST path for downloading a stored file.
pub fn file_download_path(collection: &str, file_id: &RecordId) -> String {
    format!("FileService/Download/{collection}/{file_id}")
}

/// Request body for the session login endpoint.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    #[serde(rename = "UserName")]
    pub username: &'a str,
    #[serde(rename = "UserPassword")]
    pub password: &'a str,
}

/// Body of a login response.
///
/// The platform answers HTTP 200 for rejected credentials too; rejection is
/// signaled by a non-null `Exception` payload.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    #[serde(rename = "Code", default)]
    pub code: i32,
    #[serde(rename = "Message", default)]
    pub message: Option<String>,
    #[serde(rename = "Exception", default)]
    pub exception: Option<LoginException>,
}

/// Exception payload inside a rejected login response.
#[derive(Debug, Deserialize)]
pub struct LoginException {
    #[serde(rename = "Message", default)]
    pub message: Option<String>,
}

impl LoginResponse {
    /// Returns true if the platform rejected the login despite HTTP 200.
    pub fn is_rejected(&self) -> bool {
        self.exception.is_some() || self.code != 0
    }

    /// Best-effort human-readable rejection reason.
    pub fn rejection_message(&self) -> String {
        self.exception
            .as_ref()
            .and_then(|e| e.message.clone())
            .or_else(|| self.message.clone())
            .unwrap_or_else(|| "authentication failed".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_request_uses_platform_field_names() {
        let body = LoginRequest {
            username: "Supervisor",
            password: "secret",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["UserName"], "Supervisor");
        assert_eq!(json["UserPassword"], "secret");
    }

    #[test]
    fn rejected_login_detected_from_exception() {
        let body: LoginResponse = serde_json::from_value(serde_json::json!({
            "Code": 1,
            "Message": "",
            "Exception": {"Message": "Invalid user or password"}
        }))
        .unwrap();
        assert!(body.is_rejected());
        assert_eq!(body.rejection_message(), "Invalid user or password");
    }

    #[test]
    fn successful_login_not_rejected() {
        let body: LoginResponse = serde_json::from_value(serde_json::json!({
            "Code": 0,
            "Message": "",
            "Exception": null
        }))
        .unwrap();
        assert!(!body.is_rejected());
    }

    #[test]
    fn download_path_contains_collection_and_id() {
        let id = RecordId::new("f1").unwrap();
        assert_eq!(
            file_download_path("CaseFile", &id),
            "FileService/Download/CaseFile/f1"
        );
    }
}
