use serde::Deserialize;

#[derive(Debug)]
pub enum SheetsError {
    /// The configured private key could not be used to sign an assertion.
    Credentials(String),
    /// The OAuth token endpoint refused the assertion.
    Token { status: u16, message: String },
    /// The Sheets API answered with a non-success status.
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },
    Transport(String),
}

/// Structured classification of a failure, derived from status codes only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetsErrorKind {
    PermissionDenied,
    NotFound,
    Misconfigured,
    Other,
}

impl SheetsError {
    /// Build an `Api` error from a Google error body. Falls back to the raw
    /// body when it isn't the usual `{"error": {...}}` envelope.
    pub fn from_api_response(status: u16, body: &str) -> Self {
        match serde_json::from_str::<GoogleErrorEnvelope>(body) {
            Ok(envelope) => SheetsError::Api {
                status,
                code: envelope.error.status,
                message: envelope.error.message.unwrap_or_else(|| body.to_string()),
            },
            Err(_) => SheetsError::Api {
                status,
                code: None,
                message: if body.is_empty() {
                    format!("HTTP {status}")
                } else {
                    body.chars().take(1024).collect()
                },
            },
        }
    }

    pub fn kind(&self) -> SheetsErrorKind {
        match self {
            SheetsError::Credentials(_) => SheetsErrorKind::Misconfigured,
            SheetsError::Api { status, code, .. } => match code.as_deref() {
                Some("PERMISSION_DENIED") | Some("UNAUTHENTICATED") => {
                    SheetsErrorKind::PermissionDenied
                }
                Some("NOT_FOUND") => SheetsErrorKind::NotFound,
                _ => match status {
                    401 | 403 => SheetsErrorKind::PermissionDenied,
                    404 => SheetsErrorKind::NotFound,
                    _ => SheetsErrorKind::Other,
                },
            },
            SheetsError::Token { status: 401 | 403, .. } => SheetsErrorKind::PermissionDenied,
            SheetsError::Token { .. } | SheetsError::Transport(_) => SheetsErrorKind::Other,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            SheetsError::Credentials(msg) | SheetsError::Transport(msg) => msg,
            SheetsError::Token { message, .. } | SheetsError::Api { message, .. } => message,
        }
    }
}

impl std::fmt::Display for SheetsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SheetsError::Credentials(msg) => write!(f, "Credentials: {msg}"),
            SheetsError::Token { status, message } => {
                write!(f, "Token exchange failed ({status}): {message}")
            }
            SheetsError::Api {
                status,
                code: Some(code),
                message,
            } => write!(f, "Sheets API error {status} {code}: {message}"),
            SheetsError::Api {
                status, message, ..
            } => write!(f, "Sheets API error {status}: {message}"),
            SheetsError::Transport(msg) => write!(f, "Transport: {msg}"),
        }
    }
}

impl std::error::Error for SheetsError {}

#[derive(Deserialize)]
struct GoogleErrorEnvelope {
    error: GoogleErrorBody,
}

#[derive(Deserialize)]
struct GoogleErrorBody {
    message: Option<String>,
    status: Option<String>,
}
