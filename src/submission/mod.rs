pub mod parser;
pub mod validate;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

pub use validate::{validate, ValidationError};

/// A lead-capture submission that passed validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Caller-supplied and opaque; only its type is checked.
    pub timestamp: String,
}

/// What the downstream webhook receives.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForwardedPayload {
    #[serde(flatten)]
    pub submission: SubmissionPayload,
    pub triggered_at: String,
}

impl ForwardedPayload {
    /// Stamp the submission with the current server time (ISO-8601, UTC).
    pub fn stamp(submission: SubmissionPayload) -> Self {
        Self {
            submission,
            triggered_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}
