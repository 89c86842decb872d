//! Error taxonomy for credential operations. Validation errors stop a
//! submission before any network call, provider errors carry the provider's own
//! message, and everything else is unexpected. None of them reach the view
//! state machine.

use thiserror::Error;

/// Substring the provider uses when an email or auth rate limit is hit.
const RATE_LIMIT_MARKER: &str = "rate limit";

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required.")]
    MissingField(&'static str),
    #[error("Please enter a valid email address.")]
    InvalidEmail,
    #[error("Password must be at least {min} characters.")]
    PasswordTooShort { min: usize },
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message}")]
/// Structured rejection returned by the identity provider.
pub struct ProviderError {
    pub message: String,
    pub status: Option<u16>,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Case-insensitive match on the English "rate limit" wording. Providers
    /// without structured codes only expose the limit through this text.
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        self.message.to_lowercase().contains(RATE_LIMIT_MARKER)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
/// Failure of a single provider call.
pub enum CallError {
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl CallError {
    pub fn unexpected(err: impl std::fmt::Display) -> Self {
        Self::Unexpected(err.to_string())
    }
}

impl From<reqwest::Error> for CallError {
    fn from(err: reqwest::Error) -> Self {
        Self::unexpected(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_match_ignores_case() {
        assert!(ProviderError::new("Email rate limit exceeded").is_rate_limited());
        assert!(ProviderError::new("EMAIL RATE LIMIT EXCEEDED").is_rate_limited());
        assert!(ProviderError::new("over rate limit for this project").is_rate_limited());
        assert!(!ProviderError::new("Invalid login credentials").is_rate_limited());
        assert!(!ProviderError::new("rate-limited").is_rate_limited());
    }

    #[test]
    fn provider_error_displays_raw_message() {
        let err = CallError::from(ProviderError::new("User already registered").with_status(422));
        assert_eq!(err.to_string(), "User already registered");
        match err {
            CallError::Provider(inner) => assert_eq!(inner.status, Some(422)),
            CallError::Unexpected(_) => panic!("expected provider error"),
        }
    }

    #[test]
    fn validation_messages() {
        assert_eq!(
            ValidationError::PasswordTooShort { min: 6 }.to_string(),
            "Password must be at least 6 characters."
        );
        assert_eq!(
            ValidationError::MissingField("Email").to_string(),
            "Email is required."
        );
    }
}
