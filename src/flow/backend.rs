use async_trait::async_trait;

use super::FlowError;
use crate::error::SubmitResponse;
use crate::state::SharedState;
use crate::submission::{Submission, pipeline};

/// The first phase of a signup: get the row into the spreadsheet.
#[async_trait]
pub trait WaitlistApi: Send + Sync {
    async fn submit(&self, submission: &Submission) -> Result<SubmitResponse, FlowError>;
}

/// Talks to `POST /api/submit-email` over HTTP, the way the landing page script does.
pub struct HttpApi {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpApi {
    pub fn new(base_url: &str, http: reqwest::Client) -> Self {
        Self {
            http,
            endpoint: format!("{}/api/submit-email", base_url.trim_end_matches('/')),
        }
    }
}

#[async_trait]
impl WaitlistApi for HttpApi {
    async fn submit(&self, submission: &Submission) -> Result<SubmitResponse, FlowError> {
        let resp = self
            .http
            .post(&self.endpoint)
            .json(submission)
            .send()
            .await
            .map_err(|e| FlowError::Transport(e.to_string()))?;

        let status = resp.status();
        let body = resp.json::<SubmitResponse>().await.ok();

        match body {
            Some(body) if status.is_success() && body.success => Ok(body),
            Some(body) => Err(FlowError::Rejected {
                status: status.as_u16(),
                message: body.error.unwrap_or(body.message),
            }),
            None => Err(FlowError::Rejected {
                status: status.as_u16(),
                message: "Failed to save to Google Sheets".to_string(),
            }),
        }
    }
}

/// Runs the submission pipeline in-process. Used by the plain HTML form.
pub struct LocalApi {
    state: SharedState,
}

impl LocalApi {
    pub fn new(state: SharedState) -> Self {
        Self { state }
    }
}

#[async_trait]
impl WaitlistApi for LocalApi {
    async fn submit(&self, submission: &Submission) -> Result<SubmitResponse, FlowError> {
        pipeline::record(&self.state, submission)
            .await
            .map_err(|e| {
                let body = e.body();
                FlowError::Rejected {
                    status: e.status().as_u16(),
                    message: body.error.unwrap_or(body.message),
                }
            })
    }
}
