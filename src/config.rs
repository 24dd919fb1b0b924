//! Widget configuration parsed from environment variables.
//!
//! DESIGN
//! ======
//! Every timing constant of the widget (follow-up delay, quick-reply
//! lifetime, notice delays) is a config value rather than a contract. The
//! binary loads `.env` through `dotenvy` first, then CLI flags override
//! whatever `from_env` produced.

use std::time::Duration;

use crate::api::ReportFormat;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_SURVEY_FORM_URL: &str = "https://forms.gle/olyph-survey";
pub const DEFAULT_SUPPORT_PHONE: &str = "+91 80 4718 2200";
pub const DEFAULT_CONTACT_URL: &str = "https://olyphaunt.com/contact";
pub const DEFAULT_FOLLOWUP_DELAY_SECS: u64 = 60;
pub const DEFAULT_QUICK_REPLY_LIFETIME_SECS: u64 = 60;
pub const DEFAULT_ONLINE_DELAY_MS: u64 = 1000;
pub const DEFAULT_FORM_OPEN_DELAY_MS: u64 = 500;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Errors produced while reading configuration.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable was set but its value could not be parsed.
    #[error("invalid value for {var}: '{value}'")]
    Parse { var: String, value: String },

    /// A URL variable does not start with `http://` or `https://`.
    #[error("{var} must be an http(s) URL, got '{value}'")]
    InvalidUrl { var: String, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

/// Everything the controller and its HTTP client need to run a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetConfig {
    /// Backend origin; `/ask`, `/api/report` and `/api/survey/process` hang off it.
    pub base_url: String,
    /// External survey form opened in a new browsing context.
    pub survey_form_url: String,
    pub support_phone: String,
    pub contact_url: String,
    /// How long after the form opens before the "did you fill it?" prompt.
    pub followup_delay: Duration,
    /// How long an unused quick-reply set stays on screen.
    pub quick_reply_lifetime: Duration,
    /// Delay between the Ask acknowledgement and the "online" notice.
    pub online_delay: Duration,
    /// Delay between the Survey acknowledgement and opening the form.
    pub form_open_delay: Duration,
    /// Format pre-selected in the credential modal.
    pub report_format: ReportFormat,
    pub timeouts: HttpTimeouts,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            survey_form_url: DEFAULT_SURVEY_FORM_URL.to_string(),
            support_phone: DEFAULT_SUPPORT_PHONE.to_string(),
            contact_url: DEFAULT_CONTACT_URL.to_string(),
            followup_delay: Duration::from_secs(DEFAULT_FOLLOWUP_DELAY_SECS),
            quick_reply_lifetime: Duration::from_secs(DEFAULT_QUICK_REPLY_LIFETIME_SECS),
            online_delay: Duration::from_millis(DEFAULT_ONLINE_DELAY_MS),
            form_open_delay: Duration::from_millis(DEFAULT_FORM_OPEN_DELAY_MS),
            report_format: ReportFormat::Csv,
            timeouts: HttpTimeouts::default(),
        }
    }
}

impl WidgetConfig {
    /// Build config from environment variables, falling back to defaults.
    ///
    /// - `OLYPH_BASE_URL`, `OLYPH_SURVEY_FORM_URL`, `OLYPH_CONTACT_URL`: http(s) URLs
    /// - `OLYPH_SUPPORT_PHONE`: free text
    /// - `OLYPH_FOLLOWUP_DELAY_SECS`, `OLYPH_QUICK_REPLY_LIFETIME_SECS`: seconds
    /// - `OLYPH_ONLINE_DELAY_MS`, `OLYPH_FORM_OPEN_DELAY_MS`: milliseconds
    /// - `OLYPH_REPORT_FORMAT`: `csv` (default) or `xlsx`
    /// - `OLYPH_REQUEST_TIMEOUT_SECS`, `OLYPH_CONNECT_TIMEOUT_SECS`
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = env_url("OLYPH_BASE_URL", DEFAULT_BASE_URL)?
            .trim_end_matches('/')
            .to_string();
        let survey_form_url = env_url("OLYPH_SURVEY_FORM_URL", DEFAULT_SURVEY_FORM_URL)?;
        let contact_url = env_url("OLYPH_CONTACT_URL", DEFAULT_CONTACT_URL)?;
        let support_phone = std::env::var("OLYPH_SUPPORT_PHONE").unwrap_or_else(|_| DEFAULT_SUPPORT_PHONE.to_string());

        let report_format = match std::env::var("OLYPH_REPORT_FORMAT") {
            Ok(raw) => raw
                .parse::<ReportFormat>()
                .map_err(|_| ConfigError::Parse { var: "OLYPH_REPORT_FORMAT".into(), value: raw })?,
            Err(_) => ReportFormat::Csv,
        };

        Ok(Self {
            base_url,
            survey_form_url,
            support_phone,
            contact_url,
            followup_delay: Duration::from_secs(env_parse("OLYPH_FOLLOWUP_DELAY_SECS", DEFAULT_FOLLOWUP_DELAY_SECS)?),
            quick_reply_lifetime: Duration::from_secs(env_parse(
                "OLYPH_QUICK_REPLY_LIFETIME_SECS",
                DEFAULT_QUICK_REPLY_LIFETIME_SECS,
            )?),
            online_delay: Duration::from_millis(env_parse("OLYPH_ONLINE_DELAY_MS", DEFAULT_ONLINE_DELAY_MS)?),
            form_open_delay: Duration::from_millis(env_parse("OLYPH_FORM_OPEN_DELAY_MS", DEFAULT_FORM_OPEN_DELAY_MS)?),
            report_format,
            timeouts: HttpTimeouts {
                request_secs: env_parse("OLYPH_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?,
                connect_secs: env_parse("OLYPH_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?,
            },
        })
    }
}

fn env_parse<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Parse { var: key.to_string(), value: raw }),
        Err(_) => Ok(default),
    }
}

fn env_url(key: &str, default: &str) -> Result<String, ConfigError> {
    let value = std::env::var(key).unwrap_or_else(|_| default.to_string());
    validate_url(key, value)
}

/// Reject anything that is not an absolute http(s) URL.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidUrl`] naming `var`.
pub fn validate_url(var: &str, value: String) -> Result<String, ConfigError> {
    let trimmed = value.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Ok(trimmed.to_string())
    } else {
        Err(ConfigError::InvalidUrl { var: var.to_string(), value })
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
