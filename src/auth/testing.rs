//! In-memory provider used by unit tests.

use crate::auth::{
    errors::CallError,
    events::{SessionHub, SessionSubscription},
    provider::IdentityProvider,
    types::{ChangeReason, Session, UserIdentity},
};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use std::sync::{Mutex, PoisonError};
use url::Url;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Call {
    CurrentSession,
    Authenticate { email: String },
    Register { email: String, redirect_to: String },
    RequestPasswordReset { email: String, redirect_to: String },
    SetPassword { length: usize },
    SignOut,
    CompleteRedirect { link: String },
}

#[derive(Default)]
pub(crate) struct FakeProvider {
    hub: SessionHub,
    calls: Mutex<Vec<Call>>,
    failure: Mutex<Option<CallError>>,
    recovery: Mutex<Option<UserIdentity>>,
}

impl FakeProvider {
    pub(crate) fn signed_in(user: UserIdentity) -> Self {
        Self {
            hub: SessionHub::new(Some(user)),
            ..Self::default()
        }
    }

    pub(crate) fn hub(&self) -> &SessionHub {
        &self.hub
    }

    /// Makes the next call fail with `err`.
    pub(crate) fn fail_next(&self, err: impl Into<CallError>) {
        *self.failure.lock().unwrap_or_else(PoisonError::into_inner) = Some(err.into());
    }

    /// Makes the next redirect link a recovery link for `user`.
    pub(crate) fn recovery_link_for(&self, user: UserIdentity) {
        *self.recovery.lock().unwrap_or_else(PoisonError::into_inner) = Some(user);
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, call: Call) -> Result<(), CallError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
        match self
            .failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl IdentityProvider for FakeProvider {
    async fn current_session(&self) -> Result<Session, CallError> {
        self.record(Call::CurrentSession)?;
        Ok(self.hub.current())
    }

    fn subscribe(&self) -> SessionSubscription {
        self.hub.subscribe()
    }

    async fn authenticate(&self, email: &str, _password: &SecretString) -> Result<(), CallError> {
        self.record(Call::Authenticate {
            email: email.to_string(),
        })?;
        self.hub.publish(
            ChangeReason::SignedIn,
            Some(UserIdentity::new("fake-user", Some(email.to_string()))),
        );
        Ok(())
    }

    async fn register(
        &self,
        email: &str,
        _password: &SecretString,
        redirect_to: &Url,
    ) -> Result<(), CallError> {
        self.record(Call::Register {
            email: email.to_string(),
            redirect_to: redirect_to.to_string(),
        })
    }

    async fn request_password_reset(
        &self,
        email: &str,
        redirect_to: &Url,
    ) -> Result<(), CallError> {
        self.record(Call::RequestPasswordReset {
            email: email.to_string(),
            redirect_to: redirect_to.to_string(),
        })
    }

    async fn set_password(&self, new_password: &SecretString) -> Result<(), CallError> {
        self.record(Call::SetPassword {
            length: new_password.expose_secret().chars().count(),
        })?;
        self.hub.publish(ChangeReason::Other, self.hub.current());
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), CallError> {
        self.record(Call::SignOut)?;
        if self.hub.current().is_some() {
            self.hub.publish(ChangeReason::SignedOut, None);
        }
        Ok(())
    }

    async fn complete_redirect(&self, link: &Url) -> Result<bool, CallError> {
        self.record(Call::CompleteRedirect {
            link: link.to_string(),
        })?;
        let recovery = self
            .recovery
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match recovery {
            Some(user) => {
                self.hub.publish(ChangeReason::PasswordRecovery, Some(user));
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
