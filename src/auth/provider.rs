//! Capability interface the core consumes from an identity provider. Adapters
//! own the network protocol, token storage and redirect handling; the core only
//! sees sessions, change reasons and call outcomes.

use crate::auth::{errors::CallError, events::SessionSubscription, types::Session};
use async_trait::async_trait;
use secrecy::SecretString;
use url::Url;

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// One-shot query of the session the provider currently holds.
    async fn current_session(&self) -> Result<Session, CallError>;

    /// Scoped subscription whose first event is the current snapshot.
    fn subscribe(&self) -> SessionSubscription;

    /// Signs in with email and password. The new session arrives as a
    /// `SignedIn` change, not through the return value.
    async fn authenticate(&self, email: &str, password: &SecretString) -> Result<(), CallError>;

    /// Creates an account; the verification email links back to `redirect_to`.
    async fn register(
        &self,
        email: &str,
        password: &SecretString,
        redirect_to: &Url,
    ) -> Result<(), CallError>;

    /// Sends a recovery email whose link lands on `redirect_to`.
    async fn request_password_reset(&self, email: &str, redirect_to: &Url)
        -> Result<(), CallError>;

    /// Replaces the password of the signed-in (or recovering) user.
    async fn set_password(&self, new_password: &SecretString) -> Result<(), CallError>;

    /// Ends the session. Must succeed when nobody is signed in.
    async fn sign_out(&self) -> Result<(), CallError>;

    /// Completes an email link (verification or recovery) that landed on the
    /// site URL. Returns `false` when the link carries nothing to complete.
    async fn complete_redirect(&self, _link: &Url) -> Result<bool, CallError> {
        Ok(false)
    }
}
