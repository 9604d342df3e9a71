//! Buffered HTTP response wrapper.

use std::borrow::Cow;
use std::fmt;

use bytes::Bytes;
use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde_json::Value;

use creatio_core::{Error, RecordId};

/// A buffered response from the Creatio service.
///
/// The client hands every HTTP outcome back as one of these, including
/// 4xx/5xx statuses: callers branch on the status code instead of catching
/// errors for ordinary "not found" or "validation failed" results. Only
/// transport faults and precondition violations surface as [`Error`].
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl ApiResponse {
    pub(crate) fn new(status: StatusCode, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// HTTP status of the response.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns true for 2xx statuses.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Returns true for 404, the platform's "record absent" signal.
    pub fn is_not_found(&self) -> bool {
        self.status == StatusCode::NOT_FOUND
    }

    /// All response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// A single header value, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Raw body bytes.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body decoded as text, lossily.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Parse the body as JSON.
    ///
    /// # Errors
    ///
    /// Fails if the body is empty or not valid JSON. Statuses that carry no
    /// body (204, 404) should be checked first; see [`Self::json_opt`].
    pub fn json(&self) -> Result<Value, Error> {
        if self.body.is_empty() {
            return Err(Error::InvalidBody {
                message: format!("empty body on HTTP {}", self.status),
            });
        }
        serde_json::from_slice(&self.body).map_err(|e| Error::InvalidBody {
            message: e.to_string(),
        })
    }

    /// Parse the body as JSON, returning `None` when there is nothing to
    /// parse (empty body) or the body is not JSON.
    pub fn json_opt(&self) -> Option<Value> {
        if self.body.is_empty() {
            return None;
        }
        serde_json::from_slice(&self.body).ok()
    }

    /// The server-assigned `Id` of a newly created record, when present.
    ///
    /// Creation responses (201) carry the full record including its id and
    /// computed fields; this is a shortcut for chaining into follow-up
    /// operations.
    pub fn record_id(&self) -> Option<RecordId> {
        let id = self.json_opt()?;
        let id = id.get("Id")?.as_str()?.to_string();
        RecordId::new(id).ok()
    }

    /// Opt-in conversion of non-2xx statuses into an error value.
    ///
    /// The client itself never does this; it exists for callers that prefer
    /// `?` over status branching at specific call sites.
    pub fn error_for_status(self) -> Result<Self, RemoteError> {
        if self.status.is_success() {
            Ok(self)
        } else {
            Err(RemoteError {
                status: self.status,
                body: self.text().into_owned(),
            })
        }
    }
}

/// A non-2xx status promoted to an error via [`ApiResponse::error_for_status`].
#[derive(Debug, Clone)]
pub struct RemoteError {
    /// HTTP status the service answered with.
    pub status: StatusCode,
    /// Response body as text, possibly empty.
    pub body: String,
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if !self.body.is_empty() {
            write!(f, ": {}", self.body)?;
        }
        Ok(())
    }
}

impl std::error::Error for RemoteError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: StatusCode, body: &str) -> ApiResponse {
        ApiResponse::new(status, HeaderMap::new(), Bytes::from(body.to_string()))
    }

    #[test]
    fn json_parses_body() {
        let resp = response(StatusCode::OK, r#"{"Id": "abc"}"#);
        assert_eq!(resp.json().unwrap()["Id"], "abc");
    }

    #[test]
    fn json_rejects_empty_body() {
        let resp = response(StatusCode::NO_CONTENT, "");
        assert!(resp.json().is_err());
        assert!(resp.json_opt().is_none());
    }

    #[test]
    fn not_found_is_data_not_error() {
        let resp = response(StatusCode::NOT_FOUND, "");
        assert!(resp.is_not_found());
        assert!(!resp.is_success());
        assert!(resp.json_opt().is_none());
    }

    #[test]
    fn record_id_extracted_from_creation_body() {
        let resp = response(
            StatusCode::CREATED,
            r#"{"Id": "a2c63bf2-62f2-4bbd-9c61-1a9b0459d91a", "Subject": "hi"}"#,
        );
        assert_eq!(
            resp.record_id().unwrap().as_str(),
            "a2c63bf2-62f2-4bbd-9c61-1a9b0459d91a"
        );
    }

    #[test]
    fn error_for_status_is_opt_in() {
        let resp = response(StatusCode::BAD_REQUEST, "validation failed");
        let err = resp.error_for_status().unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("validation failed"));
    }
}
