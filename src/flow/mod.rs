//! The two-phase signup flow behind the landing page form.
//!
//! `idle -> submitting -> {submitted | failed}`. The row is written first and
//! the confirmation email second. Only the provider's `OK` moves the flow to
//! `Submitted`; when the email step fails the row already exists and a retry
//! appends another one.

pub mod backend;

pub use backend::{HttpApi, LocalApi, WaitlistApi};

use crate::email::{DeliveryError, EmailSender, SendReceipt};
use crate::submission::Submission;

pub const UNAVAILABLE_MESSAGE: &str =
    "Our system is temporarily unable to process your request. The team has been notified.";
pub const INVALID_EMAIL_MESSAGE: &str = "Invalid email address. Please check and try again.";
pub const TOO_MANY_REQUESTS_MESSAGE: &str =
    "Too many requests. Please try again in a few minutes.";
pub const GENERIC_MESSAGE: &str =
    "There was an error processing your request. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FlowState {
    #[default]
    Idle,
    /// Held while a request is in flight. `submit` borrows the flow mutably
    /// until it settles, which already rules out a second concurrent submit,
    /// so `state()` never returns it.
    Submitting,
    Submitted,
    /// Idle again, carrying the message to show the user.
    Failed(String),
}

impl FlowState {
    pub fn is_submitted(&self) -> bool {
        matches!(self, FlowState::Submitted)
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            FlowState::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub enum FlowError {
    /// The submission endpoint answered with a failure status.
    Rejected { status: u16, message: String },
    Delivery(DeliveryError),
    /// The provider accepted the request but did not answer `OK`.
    Unconfirmed(SendReceipt),
    Transport(String),
}

impl FlowError {
    pub fn status(&self) -> Option<u16> {
        match self {
            FlowError::Rejected { status, .. } => Some(*status),
            FlowError::Delivery(err) => err.status(),
            FlowError::Unconfirmed(_) | FlowError::Transport(_) => None,
        }
    }
}

impl std::fmt::Display for FlowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FlowError::Rejected { status, message } => {
                write!(f, "Submission rejected ({status}): {message}")
            }
            FlowError::Delivery(err) => write!(f, "{err}"),
            FlowError::Unconfirmed(receipt) => write!(
                f,
                "Email provider answered {} without confirmation: {}",
                receipt.status, receipt.text
            ),
            FlowError::Transport(msg) => write!(f, "Submission request failed: {msg}"),
        }
    }
}

impl std::error::Error for FlowError {}

/// Map a failure to the text shown next to the form. Uses status codes only.
pub fn user_message(err: &FlowError) -> &'static str {
    match err.status() {
        Some(403) => UNAVAILABLE_MESSAGE,
        Some(400) => INVALID_EMAIL_MESSAGE,
        Some(429) => TOO_MANY_REQUESTS_MESSAGE,
        _ => GENERIC_MESSAGE,
    }
}

pub struct WaitlistFlow<A, E> {
    api: A,
    mailer: E,
    state: FlowState,
}

impl<A: WaitlistApi, E: EmailSender> WaitlistFlow<A, E> {
    pub fn new(api: A, mailer: E) -> Self {
        Self {
            api,
            mailer,
            state: FlowState::Idle,
        }
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    pub async fn submit(&mut self, email: &str) -> &FlowState {
        let email = email.trim();
        if email.is_empty() || self.state.is_submitted() {
            return &self.state;
        }

        self.state = FlowState::Submitting;

        self.state = match self.run(email).await {
            Ok(()) => FlowState::Submitted,
            Err(err) => {
                if err.status() == Some(403) {
                    tracing::error!("Permission error - check the spreadsheet sharing settings");
                }
                tracing::error!("Waitlist signup failed: {err}");
                FlowState::Failed(user_message(&err).to_string())
            }
        };

        &self.state
    }

    async fn run(&self, email: &str) -> Result<(), FlowError> {
        let submission = Submission::now(email);

        let saved = self.api.submit(&submission).await?;
        tracing::debug!("Waitlist API response: {}", saved.message);

        let receipt = self
            .mailer
            .send_confirmation(&submission.email)
            .await
            .map_err(FlowError::Delivery)?;

        if !receipt.is_ok() {
            return Err(FlowError::Unconfirmed(receipt));
        }

        Ok(())
    }
}
