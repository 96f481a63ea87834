use crate::error::{AppError, SubmitResponse};
use crate::state::AppState;

use super::Submission;

pub const MISSING_CONFIG_MESSAGE: &str = "Missing required environment variables";

/// Record one submission: authenticate, verify access, append `[email, timestamp]`.
///
/// Each call authenticates on its own and nothing is retried. Submitting the
/// same address twice appends two rows.
pub async fn record(state: &AppState, submission: &Submission) -> Result<SubmitResponse, AppError> {
    let Some(sheets) = state.sheets.as_ref() else {
        return Err(AppError::Misconfigured(MISSING_CONFIG_MESSAGE.to_string()));
    };

    tracing::debug!("Authenticating for spreadsheet {}", sheets.spreadsheet_id());
    let session = sheets.session().await?;

    let title = session.spreadsheet_title().await?;
    tracing::info!("Accessed spreadsheet: {title}");

    let outcome = session.append_row(&submission.row()).await?;
    tracing::info!(
        "Appended {} row(s) to {}",
        outcome.updated_rows,
        outcome.updated_range.as_deref().unwrap_or("waitlist range")
    );

    Ok(SubmitResponse::ok("Email saved successfully"))
}
