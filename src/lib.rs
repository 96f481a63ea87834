pub mod config;
pub mod email;
pub mod error;
pub mod flow;
pub mod routes;
pub mod sheets;
pub mod state;
pub mod submission;
pub mod views;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method, header};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::email::{EmailJsClient, EmailSender, UnconfiguredMailer};
use crate::sheets::SheetsClient;
use crate::state::{AppState, SharedState};

pub fn build_app(config: Config) -> Router {
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.http_timeout_secs))
        .build()
        .expect("Failed to build reqwest client");

    let sheets = match config.sheets.clone() {
        Some(sheets_config) => {
            tracing::info!(
                "Google Sheets configured for spreadsheet {}",
                sheets_config.spreadsheet_id
            );
            Some(SheetsClient::new(sheets_config, http.clone()))
        }
        None => {
            tracing::warn!(
                "Google Sheets not configured: set GOOGLE_CLIENT_EMAIL, GOOGLE_PRIVATE_KEY and SHEET_ID"
            );
            None
        }
    };

    let mailer: Arc<dyn EmailSender> = match config.emailjs.clone() {
        Some(emailjs_config) => {
            tracing::info!("EmailJS configured");
            Arc::new(EmailJsClient::new(emailjs_config, http))
        }
        None => {
            tracing::warn!("EmailJS not configured: confirmation emails will fail");
            Arc::new(UnconfiguredMailer)
        }
    };

    let max_body_size = config.max_body_size;
    let cors = cors_layer(&config.cors_origins);

    let state: SharedState = Arc::new(AppState {
        config,
        sheets,
        mailer,
    });

    let api = match cors {
        Some(cors) => routes::api_routes().layer(cors),
        None => routes::api_routes(),
    };

    Router::new()
        .merge(api)
        .merge(views::view_routes())
        .nest_service("/static", ServeDir::new("static"))
        .route("/health", axum::routing::get(health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(RequestBodyLimitLayer::new(max_body_size))
                .layer(SetResponseHeaderLayer::overriding(
                    HeaderName::from_static("x-content-type-options"),
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    HeaderName::from_static("x-frame-options"),
                    HeaderValue::from_static("DENY"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    HeaderName::from_static("referrer-policy"),
                    HeaderValue::from_static("strict-origin-when-cross-origin"),
                )),
        )
        .with_state(state)
}

/// CORS for the JSON API, only when a landing page is hosted on another origin.
fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Ignoring invalid CORS origin '{o}': {e}");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
            .max_age(Duration::from_secs(86400)),
    )
}

async fn health() -> &'static str {
    "ok"
}
