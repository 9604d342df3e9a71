//! File attachment operations over the platform REST services.
//!
//! Attachments live in `<Parent>File` collections (e.g. `CaseFile` for
//! `Case`). Creating one is a two-step exchange: insert the attachment
//! record through OData, then push the raw bytes to the file API service.

use reqwest::Method;
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_RANGE, CONTENT_TYPE, HeaderValue};
use serde_json::{Value, json};
use tracing::{debug, instrument};

use creatio_core::{AuthError, ConfigError, Error, RecordId, Result};

use crate::client::SessionClient;
use crate::endpoints::{ATTACHMENT_TYPE_ID, FILE_UPLOAD_PATH, file_download_path};
use crate::response::ApiResponse;

/// Default MIME type when the caller does not supply one.
const OCTET_STREAM: &str = "application/octet-stream";

impl SessionClient {
    /// Download a stored file.
    ///
    /// The response body is the file content; the original filename is in
    /// the `Content-Disposition` header (see [`attachment_filename`]).
    /// Counts against the request counter like any other call.
    #[instrument(skip(self), fields(base_url = %self.base_url()))]
    pub async fn download_file(
        &mut self,
        collection: &str,
        file_id: &RecordId,
    ) -> Result<ApiResponse> {
        if !self.is_authenticated() {
            return Err(AuthError::AuthenticationRequired.into());
        }

        let url = self.base_url().rest_url(&file_download_path(collection, file_id));
        debug!(collection, file_id = %file_id, "downloading file");

        let headers = self.session_headers(&Method::GET, collection);
        let request = self.http().get(&url).headers(headers);
        self.dispatch(request).await
    }

    /// Upload a file into an attachment collection.
    ///
    /// Inserts the attachment record, then pushes `data` in a single chunk.
    /// The record insert's non-2xx responses come back unchanged for the
    /// caller to inspect, per the client's status-as-data policy.
    ///
    /// # Errors
    ///
    /// Besides the usual precondition and transport errors, fails when a
    /// successful insert response lacks the record `Id` needed for the
    /// second step.
    #[instrument(skip(self, data), fields(base_url = %self.base_url()))]
    pub async fn upload_file(
        &mut self,
        collection: &str,
        entity_id: &RecordId,
        file_name: &str,
        mime_type: Option<&str>,
        data: Vec<u8>,
    ) -> Result<ApiResponse> {
        if !self.is_authenticated() {
            return Err(AuthError::AuthenticationRequired.into());
        }

        // Attachment collections follow the <Parent>File naming convention
        let parent = collection.strip_suffix("File").unwrap_or(collection);
        let total = data.len();

        let mut record = serde_json::Map::new();
        record.insert("Name".to_string(), json!(file_name));
        record.insert(format!("{parent}Id"), json!(entity_id.as_str()));
        record.insert("Size".to_string(), json!(total));
        record.insert("TotalSize".to_string(), json!(total));
        record.insert("TypeId".to_string(), json!(ATTACHMENT_TYPE_ID));

        let created = self
            .add_collection_data(collection, &Value::Object(record))
            .await?;
        if !created.is_success() {
            debug!(status = %created.status(), "attachment record insert refused");
            return Ok(created);
        }
        let file_id = created.record_id().ok_or_else(|| Error::InvalidBody {
            message: "attachment insert response did not include a record Id".to_string(),
        })?;
        debug!(file_id = %file_id, size = total, "pushing file content");

        let params: Vec<(String, String)> = vec![
            ("fileId".to_string(), file_id.as_str().to_string()),
            ("totalFileLength".to_string(), total.to_string()),
            (
                "mimeType".to_string(),
                mime_type.unwrap_or(OCTET_STREAM).to_string(),
            ),
            ("fileName".to_string(), file_name.to_string()),
            ("columnName".to_string(), "Data".to_string()),
            ("entitySchemaName".to_string(), collection.to_string()),
            ("parentColumnName".to_string(), parent.to_string()),
            ("parentColumnValue".to_string(), entity_id.as_str().to_string()),
        ];

        let mut headers = self.session_headers(&Method::POST, FILE_UPLOAD_PATH);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(OCTET_STREAM));
        headers.insert(
            CONTENT_DISPOSITION,
            HeaderValue::from_str(&format!("attachment; filename={file_name}")).map_err(|_| {
                ConfigError::Input {
                    message: format!("file name '{file_name}' is not sendable in a header"),
                }
            })?,
        );
        headers.insert(
            CONTENT_RANGE,
            HeaderValue::from_str(&format!(
                "bytes 0-{}/{}",
                total.saturating_sub(1),
                total
            ))
            .map_err(|e| ConfigError::Input {
                message: e.to_string(),
            })?,
        );

        let url = self.base_url().rest_url(FILE_UPLOAD_PATH);
        let request = self
            .http()
            .post(&url)
            .headers(headers)
            .query(&params)
            .body(data);
        self.dispatch(request).await
    }
}

/// Extract the filename from a download response's `Content-Disposition`.
pub fn attachment_filename(response: &ApiResponse) -> Option<String> {
    let header = response.header("content-disposition")?;
    for part in header.split(';') {
        let part = part.trim();
        if let Some(value) = part.strip_prefix("filename=") {
            return Some(value.trim_matches('"').to_string());
        }
    }
    None
}
