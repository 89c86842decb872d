//! Sign-up form. A successful registration does not sign the user in; the form
//! switches to a "verify your email" confirmation that only links back to
//! sign in.

use super::{
    mask, require_email, require_password, CredentialForm, Field, FormRequest, FormStatus,
    MIN_PASSWORD_LENGTH,
};
use crate::{
    auth::{errors::ValidationError, types::View},
    config::Redirects,
};
use secrecy::SecretString;

const RATE_LIMITED: &str = "Email rate limit exceeded. Please wait a few minutes or increase the limit in your identity provider's email settings.";
const UNEXPECTED: &str = "An unexpected error occurred. Please try again.";

#[derive(Debug)]
pub struct SignUpForm {
    email: String,
    password: SecretString,
    status: FormStatus,
    verification_sent_to: Option<String>,
}

impl Default for SignUpForm {
    fn default() -> Self {
        Self {
            email: String::new(),
            password: SecretString::from(String::new()),
            status: FormStatus::default(),
            verification_sent_to: None,
        }
    }
}

impl CredentialForm for SignUpForm {
    fn view(&self) -> View {
        View::SignUp
    }

    fn status(&self) -> &FormStatus {
        &self.status
    }

    fn status_mut(&mut self) -> &mut FormStatus {
        &mut self.status
    }

    fn fields(&self) -> &'static [Field] {
        if self.verification_sent_to.is_some() {
            &[]
        } else {
            &[Field::Email, Field::Password]
        }
    }

    fn set_field(&mut self, field: Field, value: String) -> bool {
        if self.verification_sent_to.is_some() {
            return false;
        }
        match field {
            Field::Email => self.email = value,
            Field::Password => self.password = SecretString::from(value),
        }
        true
    }

    fn field_display(&self, field: Field) -> Option<String> {
        match field {
            Field::Email => Some(self.email.clone()).filter(|email| !email.is_empty()),
            Field::Password => mask(&self.password),
        }
    }

    fn links(&self) -> &'static [View] {
        &[View::SignIn]
    }

    fn validate(&self, redirects: &Redirects) -> Result<FormRequest, ValidationError> {
        let email = require_email(&self.email)?;
        let password = require_password(
            &self.password,
            Field::Password.label(),
            MIN_PASSWORD_LENGTH,
        )?;

        Ok(FormRequest::Register {
            email,
            password,
            redirect_to: redirects.email_verification.clone(),
        })
    }

    fn rate_limit_message(&self) -> &'static str {
        RATE_LIMITED
    }

    fn unexpected_message(&self) -> &'static str {
        UNEXPECTED
    }

    fn idle_label(&self) -> &'static str {
        "Get Started"
    }

    fn busy_label(&self) -> &'static str {
        "Creating Account..."
    }

    fn on_success(&mut self) -> Option<View> {
        self.verification_sent_to = Some(self.email.trim().to_string());
        self.password = SecretString::from(String::new());
        None
    }

    fn confirmation(&self) -> Option<&str> {
        self.verification_sent_to.as_deref()
    }
}
