/// API client for the PneumoScan analysis backend
///
/// One endpoint: POST /api/analyze with the image as multipart form
/// data, JSON verdict back. The client is cheap to clone (reqwest
/// shares its connection pool) so each submission can move a copy into
/// the background task.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use super::schema::AnalysisResult;
use crate::state::selection::SelectedFile;

/// Default backend address when running everything locally.
const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Hard cap on the full analyze round trip.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// What went wrong talking to the analysis service.
///
/// Carries strings rather than source errors so it stays Clone-able
/// inside application messages; Display doubles as the banner copy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Could not reach the analysis service: {0}")]
    Network(String),
    #[error("The analysis service reported an error: {0}")]
    Server(String),
    #[error("Could not understand the analysis response: {0}")]
    Parse(String),
}

/// FastAPI error envelope for non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorDetail {
    detail: String,
}

/// Client for the analysis service.
#[derive(Debug, Clone)]
pub struct AnalysisClient {
    base_url: String,
    client: reqwest::Client,
}

impl AnalysisClient {
    /// Create a client pointed at the default localhost backend.
    pub fn new() -> Self {
        Self::with_url(DEFAULT_BASE_URL.to_string())
    }

    /// Create a client with a custom base URL.
    pub fn with_url(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();

        AnalysisClient { base_url, client }
    }

    /// Full URL of the analyze endpoint.
    pub fn analyze_url(&self) -> String {
        format!("{}/api/analyze", self.base_url)
    }

    /// Submit a selected file for diagnosis.
    ///
    /// Issues exactly one request; the form part is named `image` to
    /// match the backend's upload parameter.
    pub async fn analyze(&self, file: SelectedFile) -> Result<AnalysisResult, ApiError> {
        let part = reqwest::multipart::Part::bytes(file.bytes)
            .file_name(file.name)
            .mime_str(file.mime)
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let form = reqwest::multipart::Form::new().part("image", part);

        let response = self
            .client
            .post(self.analyze_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            // Prefer the FastAPI detail string when the body carries one
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorDetail>(&body)
                .map(|e| e.detail)
                .unwrap_or_else(|_| status.to_string());
            return Err(ApiError::Server(detail));
        }

        response
            .json::<AnalysisResult>()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }
}

impl Default for AnalysisClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_client_points_at_localhost() {
        let client = AnalysisClient::new();
        assert_eq!(client.analyze_url(), "http://localhost:8000/api/analyze");
    }

    #[test]
    fn test_custom_base_url() {
        let client = AnalysisClient::with_url("http://diagnostics:9000".to_string());
        assert_eq!(client.analyze_url(), "http://diagnostics:9000/api/analyze");
    }

    #[test]
    fn test_error_messages_are_banner_copy() {
        let err = ApiError::Network("connection refused".to_string());
        assert_eq!(
            err.to_string(),
            "Could not reach the analysis service: connection refused"
        );
    }

    #[test]
    fn test_server_detail_envelope_parses() {
        let detail: ErrorDetail =
            serde_json::from_str(r#"{"detail": "unsupported image"}"#).unwrap();
        assert_eq!(detail.detail, "unsupported image");
    }

    #[tokio::test]
    async fn test_analyze_against_unreachable_service_is_network_error() {
        // Port 9 (discard) is never running an analysis service
        let client = AnalysisClient::with_url("http://127.0.0.1:9".to_string());
        let file = SelectedFile {
            name: "chest.png".to_string(),
            mime: "image/png",
            bytes: vec![0x89, b'P', b'N', b'G'],
        };

        let result = client.analyze(file).await;
        assert!(matches!(result, Err(ApiError::Network(_))));
    }
}
