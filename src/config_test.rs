use super::*;
use std::sync::Mutex;

// Env vars are process-global; serialize every test that touches them.
static ENV_LOCK: Mutex<()> = Mutex::new(());

const VARS: &[&str] = &[
    "OLYPH_BASE_URL",
    "OLYPH_SURVEY_FORM_URL",
    "OLYPH_SUPPORT_PHONE",
    "OLYPH_CONTACT_URL",
    "OLYPH_FOLLOWUP_DELAY_SECS",
    "OLYPH_QUICK_REPLY_LIFETIME_SECS",
    "OLYPH_ONLINE_DELAY_MS",
    "OLYPH_FORM_OPEN_DELAY_MS",
    "OLYPH_REPORT_FORMAT",
    "OLYPH_REQUEST_TIMEOUT_SECS",
    "OLYPH_CONNECT_TIMEOUT_SECS",
];

/// # Safety
/// Callers hold `ENV_LOCK`.
unsafe fn clear_env() {
    for var in VARS {
        unsafe { std::env::remove_var(var) };
    }
}

#[test]
fn from_env_defaults() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe { clear_env() };

    let cfg = WidgetConfig::from_env().unwrap();
    assert_eq!(cfg, WidgetConfig::default());
    assert_eq!(cfg.followup_delay, Duration::from_secs(60));
    assert_eq!(cfg.report_format, ReportFormat::Csv);
}

#[test]
fn from_env_parses_overrides() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_env();
        std::env::set_var("OLYPH_BASE_URL", "https://chat.example.test/");
        std::env::set_var("OLYPH_FOLLOWUP_DELAY_SECS", "120");
        std::env::set_var("OLYPH_QUICK_REPLY_LIFETIME_SECS", "0");
        std::env::set_var("OLYPH_ONLINE_DELAY_MS", "250");
        std::env::set_var("OLYPH_REPORT_FORMAT", "Excel");
        std::env::set_var("OLYPH_SUPPORT_PHONE", "555-0100");
        std::env::set_var("OLYPH_REQUEST_TIMEOUT_SECS", "5");
    }

    let cfg = WidgetConfig::from_env().unwrap();
    assert_eq!(cfg.base_url, "https://chat.example.test");
    assert_eq!(cfg.followup_delay, Duration::from_secs(120));
    assert_eq!(cfg.quick_reply_lifetime, Duration::ZERO);
    assert_eq!(cfg.online_delay, Duration::from_millis(250));
    assert_eq!(cfg.report_format, ReportFormat::Xlsx);
    assert_eq!(cfg.support_phone, "555-0100");
    assert_eq!(cfg.timeouts, HttpTimeouts { request_secs: 5, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS });

    unsafe { clear_env() };
}

#[test]
fn from_env_rejects_bad_number() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_env();
        std::env::set_var("OLYPH_FOLLOWUP_DELAY_SECS", "two minutes");
    }

    let err = WidgetConfig::from_env().unwrap_err();
    assert_eq!(
        err,
        ConfigError::Parse { var: "OLYPH_FOLLOWUP_DELAY_SECS".into(), value: "two minutes".into() }
    );

    unsafe { clear_env() };
}

#[test]
fn from_env_rejects_unknown_format() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_env();
        std::env::set_var("OLYPH_REPORT_FORMAT", "pdf");
    }

    let err = WidgetConfig::from_env().unwrap_err().to_string();
    assert!(err.contains("OLYPH_REPORT_FORMAT"));

    unsafe { clear_env() };
}

#[test]
fn from_env_rejects_non_http_url() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_env();
        std::env::set_var("OLYPH_SURVEY_FORM_URL", "javascript:alert(1)");
    }

    let err = WidgetConfig::from_env().unwrap_err();
    assert!(matches!(err, ConfigError::InvalidUrl { ref var, .. } if var == "OLYPH_SURVEY_FORM_URL"));

    unsafe { clear_env() };
}

#[test]
fn validate_url_trims_whitespace() {
    assert_eq!(validate_url("X", "  https://a.test ".into()).unwrap(), "https://a.test");
}
