use crate::auth::{errors::ProviderError, types::UserIdentity};
use serde::Deserialize;
use serde_json::Value;

/// Maximum number of error body characters surfaced to the user.
const MAX_ERROR_CHARS: usize = 200;

/// Keys GoTrue uses for human-readable error text, in lookup order.
const ERROR_KEYS: [&str; 4] = ["msg", "error_description", "message", "error"];

#[derive(Deserialize)]
pub(super) struct TokenResponse {
    pub access_token: String,
    pub user: UserIdentity,
}

/// With email confirmation on, sign-up returns the bare user and no session.
#[derive(Deserialize)]
pub(super) struct SignupResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub user: Option<UserIdentity>,
}

/// Builds a `ProviderError` from a non-success response body.
pub(super) fn provider_error(status: u16, body: &str) -> ProviderError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| error_message(&json))
        .unwrap_or_else(|| sanitize_body(body));

    ProviderError::new(message).with_status(status)
}

fn error_message(json: &Value) -> Option<String> {
    ERROR_KEYS
        .iter()
        .filter_map(|key| json.get(key).and_then(Value::as_str))
        .map(str::trim)
        .find(|message| !message.is_empty())
        .map(|message| message.chars().take(MAX_ERROR_CHARS).collect())
}

/// Trims and truncates a raw error body.
fn sanitize_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "Request failed.".to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_CHARS).collect()
    }
}
