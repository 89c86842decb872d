use super::{require_email, CredentialForm, Field, FormRequest, FormStatus};
use crate::{
    auth::{
        errors::ValidationError,
        types::{FormMessage, View},
    },
    config::Redirects,
};

const RATE_LIMITED: &str = "Email rate limit exceeded. Please wait before requesting another link or check your identity provider's email settings.";
const LINK_SENT: &str = "Password reset link sent! Check your email.";

#[derive(Debug, Default)]
pub struct ForgotPasswordForm {
    email: String,
    status: FormStatus,
}

impl CredentialForm for ForgotPasswordForm {
    fn view(&self) -> View {
        View::ForgotPassword
    }

    fn status(&self) -> &FormStatus {
        &self.status
    }

    fn status_mut(&mut self) -> &mut FormStatus {
        &mut self.status
    }

    fn fields(&self) -> &'static [Field] {
        &[Field::Email]
    }

    fn set_field(&mut self, field: Field, value: String) -> bool {
        match field {
            Field::Email => {
                self.email = value;
                true
            }
            Field::Password => false,
        }
    }

    fn field_display(&self, field: Field) -> Option<String> {
        match field {
            Field::Email => Some(self.email.clone()).filter(|email| !email.is_empty()),
            Field::Password => None,
        }
    }

    fn links(&self) -> &'static [View] {
        &[View::SignIn]
    }

    fn validate(&self, redirects: &Redirects) -> Result<FormRequest, ValidationError> {
        Ok(FormRequest::RequestPasswordReset {
            email: require_email(&self.email)?,
            redirect_to: redirects.password_recovery.clone(),
        })
    }

    fn rate_limit_message(&self) -> &'static str {
        RATE_LIMITED
    }

    fn idle_label(&self) -> &'static str {
        "Send Recovery Link"
    }

    fn busy_label(&self) -> &'static str {
        "Sending link..."
    }

    fn on_success(&mut self) -> Option<View> {
        self.status.set_message(FormMessage::success(LINK_SENT));
        None
    }
}
