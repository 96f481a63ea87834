pub mod templates;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::config::EmailJsConfig;
use templates::ConfirmationParams;

/// What the provider answered to a send. Only `OK` counts as delivered.
#[derive(Debug, Clone, PartialEq)]
pub struct SendReceipt {
    pub status: u16,
    pub text: String,
}

impl SendReceipt {
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status) && self.text.trim() == "OK"
    }
}

#[derive(Debug)]
pub enum DeliveryError {
    Rejected { status: u16, body: String },
    Transport(String),
    Unconfigured,
}

impl DeliveryError {
    pub fn status(&self) -> Option<u16> {
        match self {
            DeliveryError::Rejected { status, .. } => Some(*status),
            DeliveryError::Transport(_) | DeliveryError::Unconfigured => None,
        }
    }
}

impl std::fmt::Display for DeliveryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryError::Rejected { status, body } => {
                write!(f, "Email provider rejected send ({status}): {body}")
            }
            DeliveryError::Transport(msg) => write!(f, "Email request failed: {msg}"),
            DeliveryError::Unconfigured => write!(f, "Email delivery is not configured"),
        }
    }
}

impl std::error::Error for DeliveryError {}

#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send_confirmation(&self, email: &str) -> Result<SendReceipt, DeliveryError>;
}

#[async_trait]
impl<T: EmailSender + ?Sized> EmailSender for Arc<T> {
    async fn send_confirmation(&self, email: &str) -> Result<SendReceipt, DeliveryError> {
        (**self).send_confirmation(email).await
    }
}

/// Stand-in used when the EmailJS variables are missing. Every send fails,
/// so the flow never reports a signup as confirmed.
pub struct UnconfiguredMailer;

#[async_trait]
impl EmailSender for UnconfiguredMailer {
    async fn send_confirmation(&self, _email: &str) -> Result<SendReceipt, DeliveryError> {
        Err(DeliveryError::Unconfigured)
    }
}

/// EmailJS REST client. Built once at startup and shared through the app state.
pub struct EmailJsClient {
    http: reqwest::Client,
    config: EmailJsConfig,
}

#[derive(Serialize)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: &'a ConfirmationParams,
    #[serde(rename = "accessToken", skip_serializing_if = "Option::is_none")]
    access_token: Option<&'a str>,
}

impl EmailJsClient {
    pub fn new(config: EmailJsConfig, http: reqwest::Client) -> Self {
        Self { http, config }
    }

    pub async fn send(&self, params: &ConfirmationParams) -> Result<SendReceipt, DeliveryError> {
        let url = format!(
            "{}/api/v1.0/email/send",
            self.config.api_base.trim_end_matches('/')
        );

        let request = SendRequest {
            service_id: &self.config.service_id,
            template_id: &self.config.template_id,
            user_id: &self.config.user_id,
            template_params: params,
            access_token: self.config.access_token.as_deref(),
        };

        let resp = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        let status = resp.status().as_u16();
        let text = resp
            .text()
            .await
            .unwrap_or_default()
            .chars()
            .take(1024)
            .collect::<String>();

        if !(200..300).contains(&status) {
            return Err(DeliveryError::Rejected { status, body: text });
        }

        Ok(SendReceipt { status, text })
    }
}

#[async_trait]
impl EmailSender for EmailJsClient {
    async fn send_confirmation(&self, email: &str) -> Result<SendReceipt, DeliveryError> {
        let params = templates::confirmation_params(email);
        let receipt = self.send(&params).await?;
        tracing::info!("Confirmation email accepted by provider ({})", receipt.status);
        Ok(receipt)
    }
}
