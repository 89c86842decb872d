use super::{mask, require_email, CredentialForm, Field, FormRequest, FormStatus};
use crate::{
    auth::{errors::ValidationError, types::View},
    config::Redirects,
};
use secrecy::{ExposeSecret, SecretString};

const RATE_LIMITED: &str = "Too many sign-in attempts. Please wait a moment before trying again.";

#[derive(Debug)]
pub struct SignInForm {
    email: String,
    password: SecretString,
    status: FormStatus,
}

impl Default for SignInForm {
    fn default() -> Self {
        Self {
            email: String::new(),
            password: SecretString::from(String::new()),
            status: FormStatus::default(),
        }
    }
}

impl CredentialForm for SignInForm {
    fn view(&self) -> View {
        View::SignIn
    }

    fn status(&self) -> &FormStatus {
        &self.status
    }

    fn status_mut(&mut self) -> &mut FormStatus {
        &mut self.status
    }

    fn fields(&self) -> &'static [Field] {
        &[Field::Email, Field::Password]
    }

    fn set_field(&mut self, field: Field, value: String) -> bool {
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
        &[View::SignUp, View::ForgotPassword]
    }

    fn validate(&self, _redirects: &Redirects) -> Result<FormRequest, ValidationError> {
        let email = require_email(&self.email)?;
        if self.password.expose_secret().is_empty() {
            return Err(ValidationError::MissingField(Field::Password.label()));
        }

        Ok(FormRequest::Authenticate {
            email,
            password: self.password.clone(),
        })
    }

    fn rate_limit_message(&self) -> &'static str {
        RATE_LIMITED
    }

    fn idle_label(&self) -> &'static str {
        "Sign In"
    }

    fn busy_label(&self) -> &'static str {
        "Authenticating..."
    }

    /// The session arrives through the event source; nothing to do here.
    fn on_success(&mut self) -> Option<View> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{
        errors::{CallError, ProviderError},
        forms::SubmitRejected,
        testing::{Call, FakeProvider},
        types::{ChangeReason, MessageKind},
    };
    use url::Url;

    fn redirects() -> Redirects {
        Redirects::for_site(&Url::parse("https://app.example.com").unwrap())
    }

    fn filled(email: &str, password: &str) -> SignInForm {
        let mut form = SignInForm::default();
        form.set_field(Field::Email, email.to_string());
        form.set_field(Field::Password, password.to_string());
        form
    }

    #[test]
    fn requires_both_fields() {
        let mut form = filled("", "secret");
        assert_eq!(
            form.begin_submit(&redirects()).err(),
            Some(SubmitRejected::Invalid(ValidationError::MissingField(
                "Email Address"
            )))
        );

        let mut form = filled("ada@example.com", "");
        assert_eq!(
            form.begin_submit(&redirects()).err(),
            Some(SubmitRejected::Invalid(ValidationError::MissingField(
                "Password"
            )))
        );
        assert_eq!(
            form.status().message().map(|m| m.text.as_str()),
            Some("Password is required.")
        );
        assert!(!form.status().is_submitting());
    }

    #[test]
    fn whitespace_password_is_sent_to_provider() {
        let mut form = filled("ada@example.com", "   ");
        let request = form.begin_submit(&redirects()).unwrap();

        assert!(matches!(
            request,
            FormRequest::Authenticate { ref password, .. } if password.expose_secret() == "   "
        ));
        assert!(form.status().is_submitting());
    }

    #[test]
    fn provider_error_shown_verbatim() {
        let mut form = filled("ada@example.com", "wrong");
        form.begin_submit(&redirects()).unwrap();

        let navigation = form.settle(Err(ProviderError::new("Invalid login credentials")
            .with_status(400)
            .into()));

        assert_eq!(navigation, None);
        let message = form.status().message().unwrap();
        assert_eq!(message.kind, MessageKind::Error);
        assert_eq!(message.text, "Invalid login credentials");
    }

    #[test]
    fn rate_limit_and_unexpected_mapping() {
        let mut form = filled("ada@example.com", "secret");
        form.begin_submit(&redirects()).unwrap();
        form.settle(Err(ProviderError::new("Request rate limit reached").into()));
        assert_eq!(form.status().message().unwrap().text, RATE_LIMITED);

        form.begin_submit(&redirects()).unwrap();
        form.settle(Err(CallError::unexpected("dns error")));
        assert_eq!(
            form.status().message().unwrap().text,
            "An unexpected error occurred."
        );
    }

    #[tokio::test]
    async fn success_leaves_navigation_to_session_events() {
        let provider = FakeProvider::default();
        let mut subscription = provider.hub().subscribe();
        let _ = subscription.try_recv();

        let mut form = filled(" ada@example.com ", "secret");
        let request = form.begin_submit(&redirects()).unwrap();
        let outcome = request.dispatch(&provider).await;

        assert_eq!(form.settle(outcome), None);
        assert!(form.status().message().is_none());
        assert_eq!(
            provider.calls(),
            vec![Call::Authenticate {
                email: "ada@example.com".to_string()
            }]
        );
        let event = subscription.try_recv().unwrap();
        assert_eq!(event.reason, ChangeReason::SignedIn);
    }

    #[test]
    fn password_is_masked() {
        let form = filled("ada@example.com", "hunter22");
        assert_eq!(
            form.field_display(Field::Password),
            Some("••••••••".to_string())
        );
        assert!(!format!("{form:?}").contains("hunter22"));
    }
}
