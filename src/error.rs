use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::sheets::{SheetsError, SheetsErrorKind};

pub const PERMISSION_DENIED_MESSAGE: &str =
    "Permission denied: the waitlist spreadsheet is not accessible";

/// Body of every `/api/submit-email` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SubmitResponse {
    pub fn ok(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            error: None,
        }
    }

    pub fn failed(message: &str, error: Option<String>) -> Self {
        Self {
            success: false,
            message: message.to_string(),
            error,
        }
    }
}

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Forbidden(String),
    NotFound(String),
    /// Operator has to fix the deployment; never retried.
    Misconfigured(String),
    Upstream(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Misconfigured(_) | AppError::Upstream(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn body(&self) -> SubmitResponse {
        match self {
            AppError::BadRequest(msg) => SubmitResponse::failed(msg, None),
            AppError::Forbidden(detail) => {
                SubmitResponse::failed(PERMISSION_DENIED_MESSAGE, Some(detail.clone()))
            }
            AppError::NotFound(detail) => {
                SubmitResponse::failed("Spreadsheet not found", Some(detail.clone()))
            }
            AppError::Misconfigured(detail) => {
                SubmitResponse::failed("Internal server error", Some(detail.clone()))
            }
            AppError::Upstream(detail) => {
                SubmitResponse::failed("Error accessing Google Sheets", Some(detail.clone()))
            }
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad Request: {msg}"),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {msg}"),
            AppError::NotFound(msg) => write!(f, "Not Found: {msg}"),
            AppError::Misconfigured(msg) => write!(f, "Misconfigured: {msg}"),
            AppError::Upstream(msg) => write!(f, "Upstream Error: {msg}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::BadRequest(msg) => tracing::warn!("Rejected submission: {msg}"),
            AppError::Misconfigured(msg) => tracing::error!("Misconfiguration: {msg}"),
            _ => {}
        }

        (self.status(), axum::Json(self.body())).into_response()
    }
}

impl From<SheetsError> for AppError {
    fn from(err: SheetsError) -> Self {
        tracing::error!("Google Sheets error: {err}");

        let detail = err.message().to_string();
        match err.kind() {
            SheetsErrorKind::PermissionDenied => AppError::Forbidden(detail),
            SheetsErrorKind::NotFound => AppError::NotFound(detail),
            SheetsErrorKind::Misconfigured => AppError::Misconfigured(detail),
            SheetsErrorKind::Other => AppError::Upstream(detail),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sheets_errors_map_to_statuses() {
        let forbidden: AppError = SheetsError::Api {
            status: 403,
            code: Some("PERMISSION_DENIED".to_string()),
            message: "The caller does not have permission".to_string(),
        }
        .into();
        assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(forbidden.body().message, PERMISSION_DENIED_MESSAGE);
        assert_eq!(
            forbidden.body().error.as_deref(),
            Some("The caller does not have permission")
        );

        let missing: AppError = SheetsError::from_api_response(404, "").into();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let other: AppError = SheetsError::Transport("connection reset".to_string()).into();
        assert_eq!(other.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(other.body().message, "Error accessing Google Sheets");
        assert_eq!(other.body().error.as_deref(), Some("connection reset"));

        let bad_key: AppError = SheetsError::Credentials("bad pem".to_string()).into();
        assert_eq!(bad_key.body().message, "Internal server error");
    }

    #[test]
    fn bad_request_has_no_error_field() {
        let body = AppError::BadRequest("Invalid request body".to_string()).body();
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["success"], false);
        assert!(json.get("error").is_none());
    }
}
