use super::*;
use axum::Router;
use axum::extract::Json;
use axum::http::{StatusCode as AxumStatus, header};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use serde_json::{Value, json};

// =========================================================================
// Mock backend
// =========================================================================

async fn ask_echo(Json(body): Json<Value>) -> Json<Value> {
    let message = body.get("message").and_then(Value::as_str).unwrap_or_default();
    Json(json!({ "reply": format!("echo: {message}") }))
}

async fn ask_without_reply() -> Json<Value> {
    Json(json!({ "answer": "wrong field" }))
}

async fn survey_ok() -> Json<Value> {
    Json(json!({ "status": "ok", "detail": "Updated 3 responses" }))
}

async fn report(Json(body): Json<Value>) -> axum::response::Response {
    let user = body.get("username").and_then(Value::as_str);
    let pass = body.get("password").and_then(Value::as_str);
    if user != Some("alice") || pass != Some("secret") {
        return (AxumStatus::UNAUTHORIZED, Json(json!({ "error": "bad credentials" }))).into_response();
    }
    let format = body.get("format").and_then(Value::as_str).unwrap_or("csv");
    (
        [(header::CONTENT_DISPOSITION, format!("attachment; filename=\"sheet_1.{format}\""))],
        "a,b\n1,2\n",
    )
        .into_response()
}

async fn report_no_header() -> &'static str {
    "a,b\n"
}

async fn plain_failure() -> (AxumStatus, &'static str) {
    (AxumStatus::INTERNAL_SERVER_ERROR, "boom")
}

async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn api_for(base_url: String) -> HttpApi {
    let config = WidgetConfig { base_url, ..WidgetConfig::default() };
    HttpApi::new(&config).unwrap()
}

fn alice() -> Credentials {
    Credentials { username: "alice".into(), password: "secret".into() }
}

// =========================================================================
// ask
// =========================================================================

#[tokio::test]
async fn ask_returns_reply_field() {
    let base = spawn(Router::new().route(ASK_PATH, post(ask_echo))).await;
    let reply = api_for(base).ask("What do you do?").await.unwrap();
    assert_eq!(reply.as_deref(), Some("echo: What do you do?"));
}

#[tokio::test]
async fn ask_missing_reply_is_none() {
    let base = spawn(Router::new().route(ASK_PATH, post(ask_without_reply))).await;
    assert_eq!(api_for(base).ask("hi").await.unwrap(), None);
}

#[tokio::test]
async fn ask_server_error_maps_to_status() {
    let base = spawn(Router::new().route(ASK_PATH, post(plain_failure))).await;
    let err = api_for(base).ask("hi").await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 500, ref message } if message == "Internal Server Error"));
}

#[tokio::test]
async fn ask_unreachable_backend_is_request_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = api_for(format!("http://{addr}")).ask("hi").await.unwrap_err();
    assert!(matches!(err, ApiError::Request(_)));
    assert_eq!(err.user_message(), "Could not reach the server. Please try again.");
}

// =========================================================================
// survey_status
// =========================================================================

#[tokio::test]
async fn survey_status_ok() {
    let base = spawn(Router::new().route(SURVEY_PROCESS_PATH, get(survey_ok))).await;
    let status = api_for(base).survey_status().await.unwrap();
    assert!(status.is_ok());
}

#[test]
fn survey_status_missing_field_is_not_ok() {
    let status: SurveyStatusResponse = serde_json::from_str("{}").unwrap();
    assert!(!status.is_ok());
    let status: SurveyStatusResponse = serde_json::from_str(r#"{"status":"pending"}"#).unwrap();
    assert!(!status.is_ok());
}

// =========================================================================
// download_report
// =========================================================================

#[tokio::test]
async fn report_success_uses_disposition_filename() {
    let base = spawn(Router::new().route(REPORT_PATH, post(report))).await;
    let file = api_for(base)
        .download_report(Some(&alice()), ReportFormat::Xlsx)
        .await
        .unwrap();
    assert_eq!(file.filename, "sheet_1.xlsx");
    assert_eq!(file.bytes, b"a,b\n1,2\n");
}

#[tokio::test]
async fn report_without_disposition_uses_format_default() {
    let base = spawn(Router::new().route(REPORT_PATH, post(report_no_header))).await;
    let file = api_for(base)
        .download_report(None, ReportFormat::Csv)
        .await
        .unwrap();
    assert_eq!(file.filename, "report.csv");
}

#[tokio::test]
async fn report_rejection_surfaces_server_error_text() {
    let base = spawn(Router::new().route(REPORT_PATH, post(report))).await;
    let creds = Credentials { username: "alice".into(), password: "wrong".into() };
    let err = api_for(base)
        .download_report(Some(&creds), ReportFormat::Csv)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 401, .. }));
    assert_eq!(err.user_message(), "bad credentials");
}

#[tokio::test]
async fn report_non_json_error_falls_back_to_reason() {
    let base = spawn(Router::new().route(REPORT_PATH, post(plain_failure))).await;
    let err = api_for(base)
        .download_report(Some(&alice()), ReportFormat::Csv)
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "Internal Server Error");
}

// =========================================================================
// wire types
// =========================================================================

#[test]
fn report_request_omits_missing_credentials() {
    let body = ReportRequest { username: None, password: None, format: ReportFormat::Xlsx };
    assert_eq!(serde_json::to_value(&body).unwrap(), json!({ "format": "xlsx" }));
}

#[test]
fn report_format_accepts_aliases() {
    assert_eq!("CSV".parse::<ReportFormat>().unwrap(), ReportFormat::Csv);
    assert_eq!("text/csv".parse::<ReportFormat>().unwrap(), ReportFormat::Csv);
    assert_eq!("excel".parse::<ReportFormat>().unwrap(), ReportFormat::Xlsx);
    assert!("pdf".parse::<ReportFormat>().is_err());
}

#[test]
fn credentials_debug_redacts_password() {
    let shown = format!("{:?}", alice());
    assert!(shown.contains("alice"));
    assert!(!shown.contains("secret"));
}

#[test]
fn error_message_ignores_blank_error_field() {
    assert_eq!(error_message(StatusCode::FORBIDDEN, r#"{"error":"  "}"#), "Forbidden");
}
