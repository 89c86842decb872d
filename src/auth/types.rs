//! Shared auth types: views, identities, session-change events and form
//! messages. Identities carry only non-sensitive metadata.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Credential view selected by the state machine. Exactly one is active.
pub enum View {
    #[default]
    SignIn,
    SignUp,
    ForgotPassword,
    UpdatePassword,
}

impl View {
    pub const ALL: [Self; 4] = [
        Self::SignIn,
        Self::SignUp,
        Self::ForgotPassword,
        Self::UpdatePassword,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SignIn => "sign_in",
            Self::SignUp => "sign_up",
            Self::ForgotPassword => "forgot_password",
            Self::UpdatePassword => "update_password",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for View {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|view| view.as_str() == normalized)
            .ok_or_else(|| format!("unknown view: {value}"))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// Authenticated user as reported by the provider.
pub struct UserIdentity {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl UserIdentity {
    #[must_use]
    pub fn new(id: impl Into<String>, email: Option<String>) -> Self {
        Self {
            id: id.into(),
            email,
        }
    }

    /// Local part of the email address, shown in the workspace header.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.email
            .as_deref()
            .and_then(|email| email.split('@').next())
            .filter(|name| !name.is_empty())
    }
}

/// Latest session snapshot: `None` when nobody is signed in.
pub type Session = Option<UserIdentity>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// Why the provider emitted a session change.
pub enum ChangeReason {
    Initial,
    SignedIn,
    SignedOut,
    PasswordRecovery,
    Other,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionChangeEvent {
    pub reason: ChangeReason,
    pub session: Session,
}

impl SessionChangeEvent {
    #[must_use]
    pub fn new(reason: ChangeReason, session: Session) -> Self {
        Self { reason, session }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Outcome shown inside a single credential form.
pub struct FormMessage {
    pub kind: MessageKind,
    pub text: String,
}

impl FormMessage {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Error,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.kind == MessageKind::Error
    }
}
