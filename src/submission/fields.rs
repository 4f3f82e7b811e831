use serde_json::Value;

use crate::models::NewSubmission;

pub const ALL_FIELDS_REQUIRED: &str = "All fields are required.";

/// Check that `name`, `email` and `message` are present and normalize them.
///
/// A field counts as missing when it is absent, not a string, or blank.
/// `name` and `email` are trimmed and `email` is lowercased; `message` is
/// kept as sent. The address format itself is not checked.
pub fn validate(raw: &Value) -> Result<NewSubmission, String> {
    let name = text_field(raw, "name");
    let email = text_field(raw, "email");
    let message = raw
        .get("message")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty());

    match (name, email, message) {
        (Some(name), Some(email), Some(message)) => Ok(NewSubmission {
            name: name.to_string(),
            email: email.to_lowercase(),
            message: message.to_string(),
        }),
        _ => Err(ALL_FIELDS_REQUIRED.to_string()),
    }
}

fn text_field<'a>(raw: &'a Value, key: &str) -> Option<&'a str> {
    raw.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
