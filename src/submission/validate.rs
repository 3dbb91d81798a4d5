use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use super::SubmissionPayload;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

const NAME_MAX_CHARS: usize = 50;
const EMAIL_MAX_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    NotAnObject,
    /// Field missing, not a string, or outside its length bounds (UTF-16 units).
    Length { field: &'static str, max: usize },
    EmailFormat,
    TimestampType,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::NotAnObject => write!(f, "Invalid payload: expected an object"),
            ValidationError::Length { field, max } => write!(
                f,
                "Invalid {field}: must be a string between 1 and {max} characters"
            ),
            ValidationError::EmailFormat => write!(f, "Invalid email format"),
            ValidationError::TimestampType => write!(f, "Invalid timestamp: must be a string"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Check an untrusted body against the submission rules, failing on the first
/// violation. Fields other than the four known ones are dropped.
pub fn validate(raw: &Value) -> Result<SubmissionPayload, ValidationError> {
    let obj = raw.as_object().ok_or(ValidationError::NotAnObject)?;

    let first_name = bounded_string(obj, "firstName", NAME_MAX_CHARS)?;
    let last_name = bounded_string(obj, "lastName", NAME_MAX_CHARS)?;

    let email = bounded_string(obj, "email", EMAIL_MAX_CHARS)?;
    if !EMAIL_RE.is_match(&email) {
        return Err(ValidationError::EmailFormat);
    }

    let timestamp = match obj.get("timestamp") {
        Some(Value::String(s)) => s.clone(),
        _ => return Err(ValidationError::TimestampType),
    };

    Ok(SubmissionPayload {
        first_name,
        last_name,
        email,
        timestamp,
    })
}

fn bounded_string(
    obj: &Map<String, Value>,
    field: &'static str,
    max: usize,
) -> Result<String, ValidationError> {
    match obj.get(field) {
        Some(Value::String(s)) if (1..=max).contains(&s.encode_utf16().count()) => Ok(s.clone()),
        _ => Err(ValidationError::Length { field, max }),
    }
}
