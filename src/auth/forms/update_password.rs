//! Update-password form, reached through the recovery flow. Success issues the
//! navigation back to sign in; with the recovery session still present the
//! controller then shows the workspace.

use super::{
    mask, require_password, CredentialForm, Field, FormRequest, FormStatus, MIN_PASSWORD_LENGTH,
};
use crate::{
    auth::{errors::ValidationError, types::View},
    config::Redirects,
};
use secrecy::SecretString;

const RATE_LIMITED: &str = "Too many password updates. Please wait a moment before trying again.";
const NEW_PASSWORD: &str = "New password";

#[derive(Debug)]
pub struct UpdatePasswordForm {
    password: SecretString,
    status: FormStatus,
}

impl Default for UpdatePasswordForm {
    fn default() -> Self {
        Self {
            password: SecretString::from(String::new()),
            status: FormStatus::default(),
        }
    }
}

impl CredentialForm for UpdatePasswordForm {
    fn view(&self) -> View {
        View::UpdatePassword
    }

    fn status(&self) -> &FormStatus {
        &self.status
    }

    fn status_mut(&mut self) -> &mut FormStatus {
        &mut self.status
    }

    fn fields(&self) -> &'static [Field] {
        &[Field::Password]
    }

    fn set_field(&mut self, field: Field, value: String) -> bool {
        match field {
            Field::Password => {
                self.password = SecretString::from(value);
                true
            }
            Field::Email => false,
        }
    }

    fn field_display(&self, field: Field) -> Option<String> {
        match field {
            Field::Password => mask(&self.password),
            Field::Email => None,
        }
    }

    fn links(&self) -> &'static [View] {
        &[]
    }

    fn validate(&self, _redirects: &Redirects) -> Result<FormRequest, ValidationError> {
        Ok(FormRequest::SetPassword {
            password: require_password(&self.password, NEW_PASSWORD, MIN_PASSWORD_LENGTH)?,
        })
    }

    fn rate_limit_message(&self) -> &'static str {
        RATE_LIMITED
    }

    fn idle_label(&self) -> &'static str {
        "Set New Password"
    }

    fn busy_label(&self) -> &'static str {
        "Updating..."
    }

    fn on_success(&mut self) -> Option<View> {
        self.password = SecretString::from(String::new());
        Some(View::SignIn)
    }
}
