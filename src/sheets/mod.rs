pub mod auth;
pub mod error;

use serde::Deserialize;
use serde_json::json;

pub use error::{SheetsError, SheetsErrorKind};

use crate::config::SheetsConfig;

/// Client for the one spreadsheet the waitlist writes to.
pub struct SheetsClient {
    http: reqwest::Client,
    config: SheetsConfig,
}

/// An authenticated handle, valid for the lifetime of one request.
pub struct SheetsSession<'a> {
    client: &'a SheetsClient,
    access_token: String,
}

#[derive(Debug, Clone)]
pub struct AppendOutcome {
    pub updated_range: Option<String>,
    pub updated_rows: u64,
}

#[derive(Deserialize)]
struct SpreadsheetMetadata {
    properties: Option<SpreadsheetProperties>,
}

#[derive(Deserialize)]
struct SpreadsheetProperties {
    title: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppendResponse {
    updates: Option<AppendUpdates>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppendUpdates {
    updated_range: Option<String>,
    updated_rows: Option<u64>,
}

impl SheetsClient {
    pub fn new(config: SheetsConfig, http: reqwest::Client) -> Self {
        Self { http, config }
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.config.spreadsheet_id
    }

    /// Authenticate with the service account. Called once per submission.
    pub async fn session(&self) -> Result<SheetsSession<'_>, SheetsError> {
        let access_token = auth::fetch_access_token(&self.http, &self.config).await?;
        Ok(SheetsSession {
            client: self,
            access_token,
        })
    }

    fn spreadsheet_url(&self) -> String {
        format!(
            "{}/v4/spreadsheets/{}",
            self.config.api_base.trim_end_matches('/'),
            self.config.spreadsheet_id
        )
    }
}

impl SheetsSession<'_> {
    /// Fetch the spreadsheet title. Doubles as the access check before writing.
    pub async fn spreadsheet_title(&self) -> Result<String, SheetsError> {
        let url = format!("{}?fields=properties.title", self.client.spreadsheet_url());

        let resp = self
            .client
            .http
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| SheetsError::Transport(format!("Spreadsheet lookup failed: {e}")))?;
        let resp = ensure_success(resp).await?;

        let metadata: SpreadsheetMetadata = resp
            .json()
            .await
            .map_err(|e| SheetsError::Transport(format!("Invalid spreadsheet metadata: {e}")))?;

        Ok(metadata
            .properties
            .and_then(|p| p.title)
            .unwrap_or_default())
    }

    /// Append a single row to the configured range.
    pub async fn append_row(&self, row: &[&str]) -> Result<AppendOutcome, SheetsError> {
        let url = format!(
            "{}/values/{}:append?valueInputOption=USER_ENTERED",
            self.client.spreadsheet_url(),
            self.client.config.range
        );

        let resp = self
            .client
            .http
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&json!({ "values": [row] }))
            .send()
            .await
            .map_err(|e| SheetsError::Transport(format!("Append request failed: {e}")))?;
        let resp = ensure_success(resp).await?;

        // The body only feeds logging; an unexpected shape is not a failure.
        let updates = resp
            .json::<AppendResponse>()
            .await
            .ok()
            .and_then(|r| r.updates);

        Ok(AppendOutcome {
            updated_range: updates.as_ref().and_then(|u| u.updated_range.clone()),
            updated_rows: updates.and_then(|u| u.updated_rows).unwrap_or(1),
        })
    }
}

async fn ensure_success(resp: reqwest::Response) -> Result<reqwest::Response, SheetsError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    Err(SheetsError::from_api_response(status.as_u16(), &body))
}
