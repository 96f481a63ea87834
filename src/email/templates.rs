use serde::Serialize;

pub const CONFIRMATION_MESSAGE: &str =
    "Thank you for joining our waitlist! We'll keep you updated on our launch.";

/// Substitution variables for the provider-side confirmation template.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ConfirmationParams {
    pub to_email: String,
    pub reply_to: String,
    pub to_name: String,
    pub message: String,
}

pub fn confirmation_params(email: &str) -> ConfirmationParams {
    ConfirmationParams {
        to_email: email.to_string(),
        reply_to: email.to_string(),
        to_name: display_name(email).to_string(),
        message: CONFIRMATION_MESSAGE.to_string(),
    }
}

/// The local part of the address, used to greet the recipient.
fn display_name(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}
