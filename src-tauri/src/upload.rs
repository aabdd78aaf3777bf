//! Upload client — posts a capture to the backend and returns the patient id.
//!
//! The backend answers with a bare identifier (JSON string, JSON number, or
//! plain text). Every failure mode collapses into `UploadError`; there is no
//! retry, the user re-triggers instead. Requests are bounded by a timeout so a
//! backend that never answers still ends the capture run.

use crate::capture::CodecError;
use serde::Serialize;
use std::time::Duration;

pub const UPLOAD_PATH: &str = "/api/desktop/patients";

/// Upper bound on one upload, from connect to the last byte of the reply.
pub const UPLOAD_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
struct UploadBody<'a> {
    image: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    software: Option<&'a str>,
}

#[derive(Debug, Clone)]
pub struct UploadClient {
    client: reqwest::Client,
    endpoint: String,
}

impl UploadClient {
    pub fn new(backend_url: &str) -> Result<Self, UploadError> {
        Self::with_builder(reqwest::Client::builder(), backend_url, UPLOAD_TIMEOUT)
    }

    /// Finish `builder` with the request timeout and bind it to `backend_url`.
    pub fn with_builder(
        builder: reqwest::ClientBuilder,
        backend_url: &str,
        timeout: Duration,
    ) -> Result<Self, UploadError> {
        let client = builder
            .timeout(timeout)
            .build()
            .map_err(|e| UploadError::Request(e.to_string()))?;
        Ok(Self::with_client(client, backend_url))
    }

    pub fn with_client(client: reqwest::Client, backend_url: &str) -> Self {
        Self {
            client,
            endpoint: format!("{}{}", backend_url.trim_end_matches('/'), UPLOAD_PATH),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Upload one encoded capture plus the practice software preference.
    pub async fn upload(&self, image_data_uri: &str, software: Option<&str>) -> Result<String, UploadError> {
        if image_data_uri.is_empty() {
            return Err(UploadError::EmptyImage);
        }

        let start = std::time::Instant::now();
        log::info!(
            "[UPLOAD] Sending to backend {} ({} bytes, software={})",
            self.endpoint,
            image_data_uri.len(),
            software.unwrap_or("<unset>")
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(&UploadBody {
                image: image_data_uri,
                software,
            })
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        let body = response.text().await.map_err(request_error)?;

        if !status.is_success() {
            return Err(UploadError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let id = parse_identifier(&body)?;
        log::info!(
            "[UPLOAD] Response ID: {} ({}ms)",
            id,
            start.elapsed().as_millis()
        );
        Ok(id)
    }
}

fn request_error(e: reqwest::Error) -> UploadError {
    if e.is_timeout() {
        UploadError::TimedOut
    } else {
        UploadError::Request(e.to_string())
    }
}

/// Extract the opaque identifier from a success response body.
///
/// JSON strings are unquoted and kept as-is, JSON numbers are kept exactly as
/// written, and any other payload is taken as trimmed text.
pub fn parse_identifier(body: &str) -> Result<String, UploadError> {
    let trimmed = body.trim();
    let id = match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(serde_json::Value::String(s)) => s,
        Ok(serde_json::Value::Number(_)) => trimmed.to_string(),
        Ok(serde_json::Value::Null) => String::new(),
        Ok(other @ (serde_json::Value::Object(_) | serde_json::Value::Array(_))) => {
            return Err(UploadError::UnexpectedBody(other.to_string()));
        }
        _ => trimmed.to_string(),
    };

    if id.trim().is_empty() {
        return Err(UploadError::EmptyIdentifier);
    }
    Ok(id)
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Refusing to upload an empty image")]
    EmptyImage,

    #[error("Could not encode capture: {0}")]
    Encoding(#[from] CodecError),

    #[error("Upload request failed: {0}")]
    Request(String),

    #[error("Backend did not answer within {}s", UPLOAD_TIMEOUT.as_secs())]
    TimedOut,

    #[error("Backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Backend returned no identifier")]
    EmptyIdentifier,

    #[error("Backend returned an unexpected body: {0}")]
    UnexpectedBody(String),
}
