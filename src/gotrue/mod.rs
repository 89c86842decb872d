//! [`IdentityProvider`] for GoTrue-compatible servers (Supabase Auth).
//!
//! The client keeps the current session in memory and publishes every change on
//! its embedded [`SessionHub`]. Email links are completed through
//! [`IdentityProvider::complete_redirect`], which is where the recovery flow
//! enters the crate.

pub mod fragment;
mod types;

use crate::{
    auth::{
        errors::CallError,
        events::{SessionHub, SessionSubscription},
        provider::IdentityProvider,
        types::{ChangeReason, Session, UserIdentity},
    },
    config::AppConfig,
    APP_USER_AGENT,
};
use anyhow::Result;
use async_trait::async_trait;
use fragment::{LinkType, RedirectFragment};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::sync::{PoisonError, RwLock};
use tracing::{debug, info, instrument, warn};
use types::{provider_error, SignupResponse, TokenResponse};
use url::Url;

struct StoredSession {
    access_token: SecretString,
    user: UserIdentity,
}

pub struct GoTrueClient {
    config: AppConfig,
    http: Client,
    hub: SessionHub,
    session: RwLock<Option<StoredSession>>,
}

impl GoTrueClient {
    /// Creates a client with no session. Nothing is sent until the first call.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: AppConfig) -> Result<Self> {
        let http = Client::builder().user_agent(APP_USER_AGENT).build()?;

        Ok(Self {
            config,
            http,
            hub: SessionHub::default(),
            session: RwLock::new(None),
        })
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Builds a request against the provider with the `apikey` header set.
    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, CallError> {
        let url = endpoint_url(self.config.provider_url(), path)?;

        Ok(self
            .http
            .request(method, url)
            .header("apikey", self.config.anon_key().expose_secret()))
    }

    fn access_token(&self) -> Option<SecretString> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|session| session.access_token.clone())
    }

    fn store_session(&self, access_token: SecretString, user: UserIdentity, reason: ChangeReason) {
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = Some(StoredSession {
            access_token,
            user: user.clone(),
        });
        self.hub.publish(reason, Some(user));
    }

    fn clear_session(&self) {
        self.session
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        self.hub.publish(ChangeReason::SignedOut, None);
    }
}

#[async_trait]
impl IdentityProvider for GoTrueClient {
    #[instrument(skip(self))]
    async fn current_session(&self) -> Result<Session, CallError> {
        let Some(token) = self.access_token() else {
            return Ok(None);
        };

        let response = self
            .request(Method::GET, "auth/v1/user")?
            .bearer_auth(token.expose_secret())
            .send()
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            debug!("stored session is no longer valid");
            return Ok(None);
        }

        let user: UserIdentity = checked(response).await?.json().await?;
        if let Some(session) = self
            .session
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .as_mut()
        {
            session.user = user.clone();
        }

        Ok(Some(user))
    }

    fn subscribe(&self) -> SessionSubscription {
        self.hub.subscribe()
    }

    #[instrument(skip(self, password))]
    async fn authenticate(&self, email: &str, password: &SecretString) -> Result<(), CallError> {
        let request = self
            .request(Method::POST, "auth/v1/token")?
            .query(&[("grant_type", "password")])
            .json(&json!({
                "email": email,
                "password": password.expose_secret(),
            }));

        let token: TokenResponse = send_json(request).await?;
        info!(user_id = %token.user.id, "signed in");
        self.store_session(
            SecretString::from(token.access_token),
            token.user,
            ChangeReason::SignedIn,
        );

        Ok(())
    }

    #[instrument(skip(self, password, redirect_to), fields(redirect_to = %redirect_to))]
    async fn register(
        &self,
        email: &str,
        password: &SecretString,
        redirect_to: &Url,
    ) -> Result<(), CallError> {
        let request = self
            .request(Method::POST, "auth/v1/signup")?
            .query(&[("redirect_to", redirect_to.as_str())])
            .json(&json!({
                "email": email,
                "password": password.expose_secret(),
            }));

        let response: SignupResponse = send_json(request).await?;
        match (response.access_token, response.user) {
            (Some(access_token), Some(user)) => {
                info!(user_id = %user.id, "registered and signed in");
                self.store_session(
                    SecretString::from(access_token),
                    user,
                    ChangeReason::SignedIn,
                );
            }
            _ => info!("registered, awaiting email verification"),
        }

        Ok(())
    }

    #[instrument(skip(self, redirect_to), fields(redirect_to = %redirect_to))]
    async fn request_password_reset(
        &self,
        email: &str,
        redirect_to: &Url,
    ) -> Result<(), CallError> {
        let request = self
            .request(Method::POST, "auth/v1/recover")?
            .query(&[("redirect_to", redirect_to.as_str())])
            .json(&json!({ "email": email }));

        send_empty(request).await
    }

    #[instrument(skip_all)]
    async fn set_password(&self, new_password: &SecretString) -> Result<(), CallError> {
        let Some(token) = self.access_token() else {
            return Err(CallError::unexpected("no active session"));
        };

        let request = self
            .request(Method::PUT, "auth/v1/user")?
            .bearer_auth(token.expose_secret())
            .json(&json!({ "password": new_password.expose_secret() }));

        let user: UserIdentity = send_json(request).await?;
        info!(user_id = %user.id, "password updated");
        self.store_session(token, user, ChangeReason::Other);

        Ok(())
    }

    #[instrument(skip(self))]
    async fn sign_out(&self) -> Result<(), CallError> {
        let Some(token) = self.access_token() else {
            debug!("sign out without a session");
            return Ok(());
        };

        let response = self
            .request(Method::POST, "auth/v1/logout")?
            .bearer_auth(token.expose_secret())
            .send()
            .await?;

        // An expired or revoked token already means signed out on the server.
        if response.status() != StatusCode::UNAUTHORIZED {
            checked(response).await?;
        }

        info!("signed out");
        self.clear_session();

        Ok(())
    }

    /// Recovery links sign the user in and publish `PasswordRecovery`; other
    /// links with tokens publish `SignedIn`.
    #[instrument(skip_all)]
    async fn complete_redirect(&self, link: &Url) -> Result<bool, CallError> {
        let (access_token, link_type) = match fragment::parse(link) {
            None => {
                debug!("redirect link carries no session");
                return Ok(false);
            }
            Some(RedirectFragment::Error(err)) => {
                warn!(status = ?err.status, "redirect link rejected: {}", err.message);
                return Err(err.into());
            }
            Some(RedirectFragment::Session {
                access_token,
                link_type,
            }) => (access_token, link_type),
        };

        let request = self
            .request(Method::GET, "auth/v1/user")?
            .bearer_auth(access_token.expose_secret());
        let user: UserIdentity = send_json(request).await?;

        let reason = match link_type {
            LinkType::Recovery => ChangeReason::PasswordRecovery,
            LinkType::Other => ChangeReason::SignedIn,
        };
        info!(?reason, user_id = %user.id, "redirect link completed");
        self.store_session(access_token, user, reason);

        Ok(true)
    }
}

/// Joins `path` onto the provider base URL, keeping any base path.
fn endpoint_url(base: &Url, path: &str) -> Result<Url, CallError> {
    let base = base.as_str().trim_end_matches('/');
    let url = format!("{base}/{}", path.trim_start_matches('/'));

    Url::parse(&url).map_err(CallError::unexpected)
}

async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, CallError> {
    let response = checked(request.send().await?).await?;
    Ok(response.json::<T>().await?)
}

async fn send_empty(request: RequestBuilder) -> Result<(), CallError> {
    checked(request.send().await?).await?;
    Ok(())
}

/// Passes successful responses through and turns the rest into provider errors.
async fn checked(response: Response) -> Result<Response, CallError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let err = provider_error(status.as_u16(), &body);
    debug!(status = status.as_u16(), "provider rejected request: {}", err.message);

    Err(err.into())
}
