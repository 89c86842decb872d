//! Credential forms. Each form collects its own input, validates it locally,
//! turns it into exactly one provider request and maps the outcome into its own
//! message slot. Forms never touch the controller; the only effect they have on
//! the view is the navigation request returned from [`CredentialForm::settle`]
//! or chosen from [`CredentialForm::links`].
//!
//! Submissions are split in two so the provider call can run elsewhere:
//! [`CredentialForm::begin_submit`] validates and marks the form busy, then
//! [`CredentialForm::settle`] applies whatever the call returned.

mod forgot_password;
mod sign_in;
mod sign_up;
mod update_password;

pub use forgot_password::ForgotPasswordForm;
pub use sign_in::SignInForm;
pub use sign_up::SignUpForm;
pub use update_password::UpdatePasswordForm;

use crate::{
    auth::{
        errors::{CallError, ValidationError},
        provider::IdentityProvider,
        types::{FormMessage, View},
    },
    config::Redirects,
};
use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::instrument;
use url::Url;

/// Minimum password length accepted before calling the provider.
pub const MIN_PASSWORD_LENGTH: usize = 6;

const UNEXPECTED_ERROR: &str = "An unexpected error occurred.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    Email,
    Password,
}

impl Field {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Email => "Email Address",
            Self::Password => "Password",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitRejected {
    #[error("a submission is already in progress")]
    Busy,
    #[error("this form has nothing to submit")]
    Closed,
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Provider call built from a validated form. It owns its data so it can run
/// on a task that outlives the form.
pub enum FormRequest {
    Authenticate {
        email: String,
        password: SecretString,
    },
    Register {
        email: String,
        password: SecretString,
        redirect_to: Url,
    },
    RequestPasswordReset {
        email: String,
        redirect_to: Url,
    },
    SetPassword {
        password: SecretString,
    },
}

impl FormRequest {
    #[must_use]
    pub const fn operation(&self) -> &'static str {
        match self {
            Self::Authenticate { .. } => "authenticate",
            Self::Register { .. } => "register",
            Self::RequestPasswordReset { .. } => "request_password_reset",
            Self::SetPassword { .. } => "set_password",
        }
    }

    /// Runs the request against `provider`.
    ///
    /// # Errors
    /// Returns whatever the provider call returned.
    #[instrument(skip_all, fields(operation = self.operation()))]
    pub async fn dispatch(self, provider: &dyn IdentityProvider) -> Result<(), CallError> {
        match self {
            Self::Authenticate { email, password } => {
                provider.authenticate(&email, &password).await
            }
            Self::Register {
                email,
                password,
                redirect_to,
            } => provider.register(&email, &password, &redirect_to).await,
            Self::RequestPasswordReset { email, redirect_to } => {
                provider.request_password_reset(&email, &redirect_to).await
            }
            Self::SetPassword { password } => provider.set_password(&password).await,
        }
    }
}

#[derive(Clone, Debug, Default)]
/// Message slot and busy flag every form carries.
pub struct FormStatus {
    message: Option<FormMessage>,
    submitting: bool,
}

impl FormStatus {
    #[must_use]
    pub fn message(&self) -> Option<&FormMessage> {
        self.message.as_ref()
    }

    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub(crate) fn set_message(&mut self, message: FormMessage) {
        self.message = Some(message);
    }
}

/// Capability set shared by the credential forms.
pub trait CredentialForm: Send {
    fn view(&self) -> View;

    fn status(&self) -> &FormStatus;

    fn status_mut(&mut self) -> &mut FormStatus;

    /// Inputs the form currently accepts, in display order.
    fn fields(&self) -> &'static [Field];

    /// Stores `value` into `field`. Returns `false` if the form has no such field.
    fn set_field(&mut self, field: Field, value: String) -> bool;

    /// Current value for display; passwords come back masked.
    fn field_display(&self, field: Field) -> Option<String>;

    /// Views this form links to.
    fn links(&self) -> &'static [View];

    /// Local checks, producing the provider request on success.
    ///
    /// # Errors
    /// Returns the first failed check.
    fn validate(&self, redirects: &Redirects) -> Result<FormRequest, ValidationError>;

    /// Replacement text when the provider reports a rate limit.
    fn rate_limit_message(&self) -> &'static str;

    fn unexpected_message(&self) -> &'static str {
        UNEXPECTED_ERROR
    }

    fn idle_label(&self) -> &'static str;

    fn busy_label(&self) -> &'static str;

    /// Applies a successful call; may request navigation.
    fn on_success(&mut self) -> Option<View>;

    /// Address a verification email was sent to, if the form is showing that
    /// confirmation instead of its inputs.
    fn confirmation(&self) -> Option<&str> {
        None
    }

    fn submit_label(&self) -> &'static str {
        if self.status().is_submitting() {
            self.busy_label()
        } else {
            self.idle_label()
        }
    }

    fn offers(&self, view: View) -> bool {
        self.links().contains(&view)
    }

    /// Clears the message slot, validates and marks the form busy.
    ///
    /// # Errors
    /// Rejects while a previous submission is in flight, when the form shows
    /// no inputs, or when validation fails (the message slot then holds the
    /// validation text).
    fn begin_submit(&mut self, redirects: &Redirects) -> Result<FormRequest, SubmitRejected> {
        if self.status().is_submitting() {
            return Err(SubmitRejected::Busy);
        }
        if self.fields().is_empty() {
            return Err(SubmitRejected::Closed);
        }

        self.status_mut().message = None;

        match self.validate(redirects) {
            Ok(request) => {
                self.status_mut().submitting = true;
                Ok(request)
            }
            Err(err) => {
                self.status_mut()
                    .set_message(FormMessage::error(err.to_string()));
                Err(SubmitRejected::Invalid(err))
            }
        }
    }

    /// Applies the provider outcome and returns any navigation request.
    fn settle(&mut self, outcome: Result<(), CallError>) -> Option<View> {
        self.status_mut().submitting = false;

        match outcome {
            Ok(()) => self.on_success(),
            Err(err) => {
                let text = error_text(&err, self.rate_limit_message(), self.unexpected_message());
                self.status_mut().set_message(FormMessage::error(text));
                None
            }
        }
    }
}

/// Builds a fresh form for `view`.
#[must_use]
pub fn for_view(view: View) -> Box<dyn CredentialForm> {
    match view {
        View::SignIn => Box::new(SignInForm::default()),
        View::SignUp => Box::new(SignUpForm::default()),
        View::ForgotPassword => Box::new(ForgotPasswordForm::default()),
        View::UpdatePassword => Box::new(UpdatePasswordForm::default()),
    }
}

/// Maps a call failure to user-facing text: the provider's own message, the
/// form's remediation text for rate limits, or the generic fallback.
#[must_use]
pub fn error_text(err: &CallError, rate_limit: &str, unexpected: &str) -> String {
    match err {
        CallError::Provider(provider) if provider.is_rate_limited() => rate_limit.to_string(),
        CallError::Provider(provider) => provider.message.clone(),
        CallError::Unexpected(_) => unexpected.to_string(),
    }
}

#[must_use]
pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email))
}

/// Trimmed, non-empty, well-formed email.
pub(crate) fn require_email(email: &str) -> Result<String, ValidationError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::MissingField(Field::Email.label()));
    }
    if !valid_email(email) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(email.to_string())
}

/// Non-empty password of at least `min` characters.
pub(crate) fn require_password(
    password: &SecretString,
    label: &'static str,
    min: usize,
) -> Result<SecretString, ValidationError> {
    let length = password.expose_secret().chars().count();
    if length == 0 {
        return Err(ValidationError::MissingField(label));
    }
    if length < min {
        return Err(ValidationError::PasswordTooShort { min });
    }
    Ok(password.clone())
}

pub(crate) fn mask(password: &SecretString) -> Option<String> {
    let length = password.expose_secret().chars().count();
    (length > 0).then(|| "•".repeat(length))
}
