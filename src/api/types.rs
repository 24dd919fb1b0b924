//! Wire types for the three backend endpoints and the client error type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by backend calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (connect, timeout, TLS, ...).
    #[error("request failed: {0}")]
    Request(String),

    /// The backend answered with a non-success status.
    #[error("status {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body did not have the expected shape.
    #[error("response parse failed: {0}")]
    Parse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ApiError {
    /// Text suitable for showing inline to the visitor.
    ///
    /// Status errors carry the server-provided message; everything else
    /// collapses to a generic line.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Status { message, .. } if !message.trim().is_empty() => message.clone(),
            Self::Status { status, .. } => format!("Request failed ({status})."),
            Self::Request(_) | Self::Parse(_) | Self::HttpClientBuild(_) => {
                "Could not reach the server. Please try again.".to_string()
            }
        }
    }
}

// =============================================================================
// REPORT FORMAT
// =============================================================================

/// Download format for `/api/report`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Csv,
    Xlsx,
}

impl ReportFormat {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
        }
    }

    /// Filename used when the response carries no `Content-Disposition`.
    #[must_use]
    pub fn default_filename(self) -> String {
        format!("report.{}", self.as_str())
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported report format '{0}' (expected 'csv' or 'xlsx')")]
pub struct FormatParseError(pub String);

impl FromStr for ReportFormat {
    type Err = FormatParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" | "text/csv" => Ok(Self::Csv),
            "xlsx" | "excel" => Ok(Self::Xlsx),
            _ => Err(FormatParseError(s.to_string())),
        }
    }
}

// =============================================================================
// REQUEST / RESPONSE BODIES
// =============================================================================

#[derive(Debug, Serialize)]
pub struct AskRequest<'a> {
    pub message: &'a str,
}

/// `/ask` response. `reply` may be absent on a misbehaving backend.
#[derive(Debug, Deserialize)]
pub struct AskResponse {
    #[serde(default)]
    pub reply: Option<String>,
}

/// `/api/survey/process` response.
#[derive(Debug, Deserialize)]
pub struct SurveyStatusResponse {
    #[serde(default)]
    pub status: Option<String>,
}

impl SurveyStatusResponse {
    /// Only the literal `"ok"` counts as a confirmed submission.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status.as_deref() == Some("ok")
    }
}

#[derive(Debug, Serialize)]
pub struct ReportRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<&'a str>,
    pub format: ReportFormat,
}

/// Error body returned by `/api/report` on failure.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

/// A downloaded report ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Credentials collected by the modal.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
