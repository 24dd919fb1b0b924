//! Backend API: the three HTTP endpoints the widget talks to.
//!
//! DESIGN
//! ======
//! The controller only sees the [`ChatApi`] trait so tests can swap in a
//! scripted backend. [`HttpApi`] is the real implementation over `reqwest`.
//! Response bodies are treated as loosely shaped: missing fields surface as
//! `None` and the controller picks the defaults.
//!
//! ERROR HANDLING
//! ==============
//! No retries. Transport failures map to [`ApiError::Request`], non-success
//! statuses to [`ApiError::Status`] carrying the server's `{error}` text when
//! it sent one, otherwise the canonical status reason.

pub mod disposition;
pub mod types;

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::CONTENT_DISPOSITION;

use crate::config::WidgetConfig;
pub use types::{
    ApiError, AskRequest, AskResponse, Credentials, ErrorBody, FormatParseError, ReportFile, ReportFormat,
    ReportRequest, SurveyStatusResponse,
};

pub const ASK_PATH: &str = "/ask";
pub const SURVEY_PROCESS_PATH: &str = "/api/survey/process";
pub const REPORT_PATH: &str = "/api/report";

// =============================================================================
// TRAIT
// =============================================================================

/// Async seam between the controller and the backend. Enables mocking in tests.
#[async_trait::async_trait]
pub trait ChatApi: Send + Sync {
    /// `POST /ask`: returns the `reply` field, `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure or non-success status.
    async fn ask(&self, message: &str) -> Result<Option<String>, ApiError>;

    /// `GET /api/survey/process`: confirm a survey submission.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure or non-success status.
    async fn survey_status(&self) -> Result<SurveyStatusResponse, ApiError>;

    /// `POST /api/report`: authenticated report download.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Status`] with the server's message on rejection.
    async fn download_report(
        &self,
        credentials: Option<&Credentials>,
        format: ReportFormat,
    ) -> Result<ReportFile, ApiError>;
}

// =============================================================================
// HTTP CLIENT
// =============================================================================

pub struct HttpApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpApi {
    /// Build a client against `config.base_url` with the configured timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::HttpClientBuild`] if the TLS backend fails to initialise.
    pub fn new(config: &WidgetConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: config.base_url.trim_end_matches('/').to_string() })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait::async_trait]
impl ChatApi for HttpApi {
    async fn ask(&self, message: &str) -> Result<Option<String>, ApiError> {
        let response = self
            .http
            .post(self.url(ASK_PATH))
            .json(&AskRequest { message })
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;
        let response = ensure_success(response).await?;
        let body: AskResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))?;
        Ok(body.reply)
    }

    async fn survey_status(&self) -> Result<SurveyStatusResponse, ApiError> {
        let response = self
            .http
            .get(self.url(SURVEY_PROCESS_PATH))
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;
        let response = ensure_success(response).await?;
        response
            .json::<SurveyStatusResponse>()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    async fn download_report(
        &self,
        credentials: Option<&Credentials>,
        format: ReportFormat,
    ) -> Result<ReportFile, ApiError> {
        let body = ReportRequest {
            username: credentials.map(|c| c.username.as_str()),
            password: credentials.map(|c| c.password.as_str()),
            format,
        };
        let response = self
            .http
            .post(self.url(REPORT_PATH))
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;
        let response = ensure_success(response).await?;

        let filename = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(disposition::filename_from_disposition)
            .unwrap_or_else(|| format.default_filename());
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;
        Ok(ReportFile { filename, bytes: bytes.to_vec() })
    }
}

/// Pass 2xx responses through; turn anything else into [`ApiError::Status`].
async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response.text().await.unwrap_or_default();
    Err(ApiError::Status { status: status.as_u16(), message: error_message(status, &text) })
}

/// Prefer the JSON `{error}` body, then the canonical reason phrase.
fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|e| !e.trim().is_empty())
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Request failed").to_string())
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
