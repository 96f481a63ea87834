pub mod fields;
pub mod parser;
pub mod pipeline;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// One waitlist signup. Lives for a single request; the spreadsheet is the only store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub email: String,
    pub timestamp: String,
}

impl Submission {
    /// Stamp a submission with the current time, formatted like a browser's `toISOString()`.
    pub fn now(email: &str) -> Self {
        Self {
            email: email.trim().to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    pub fn row(&self) -> [&str; 2] {
        [self.email.as_str(), self.timestamp.as_str()]
    }
}
