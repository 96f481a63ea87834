use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;

use crate::error::{AppError, SubmitResponse};
use crate::state::SharedState;
use crate::submission::{fields, parser, pipeline};

pub async fn submit_email(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<SubmitResponse>, AppError> {
    tracing::info!("Received waitlist submission");

    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok());

    let raw = parser::parse_body(content_type, &body).map_err(|e| {
        tracing::warn!("Failed to parse request body: {e}");
        AppError::BadRequest("Invalid request body".to_string())
    })?;

    let submission = fields::require_submission(&raw).map_err(AppError::BadRequest)?;

    let response = pipeline::record(&state, &submission).await?;
    Ok(Json(response))
}
