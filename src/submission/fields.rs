use serde_json::Value;

use super::Submission;

pub const REQUIRED_FIELDS_MESSAGE: &str = "Email and timestamp are required";

/// Pull the two required fields out of a parsed body.
/// Blank, null, and non-string values all count as missing. Values are kept
/// as sent; the email format is not checked here.
pub fn require_submission(raw: &Value) -> Result<Submission, String> {
    let email = required_str(raw, "email");
    let timestamp = required_str(raw, "timestamp");

    match (email, timestamp) {
        (Some(email), Some(timestamp)) => Ok(Submission {
            email: email.to_string(),
            timestamp: timestamp.to_string(),
        }),
        _ => Err(REQUIRED_FIELDS_MESSAGE.to_string()),
    }
}

fn required_str<'a>(raw: &'a Value, name: &str) -> Option<&'a str> {
    raw.get(name)
        .and_then(|v| v.as_str())
        .filter(|s| !s.trim().is_empty())
}
