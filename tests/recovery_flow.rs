//! End-to-end checks of the auth core against a mocked identity provider.
//!
//! These tests wire the GoTrue adapter, the controller and the credential
//! forms together the way the terminal front end does, without a terminal:
//! 1. Follow a password-recovery link and land on the update-password view.
//! 2. Set a new password and reach the workspace.
//! 3. Sign in from scratch, then sign out twice.

use anyhow::{Context, Result};
use nexus::{
    auth::{
        forms::{self, Field},
        AuthController, IdentityProvider, Screen, UserIdentity, View,
    },
    config::AppConfig,
    gotrue::GoTrueClient,
};
use secrecy::SecretString;
use serde_json::json;
use std::net::TcpListener;
use url::Url;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn can_bind_localhost() -> bool {
    TcpListener::bind("127.0.0.1:0").is_ok()
}

fn client(server: &MockServer) -> Result<GoTrueClient> {
    let config = AppConfig::new(&server.uri(), SecretString::from("anon-key".to_string()))?
        .with_site_url("https://app.example.com")?;
    GoTrueClient::new(config)
}

fn ada() -> UserIdentity {
    UserIdentity::new("u1", Some("ada@example.com".to_string()))
}

#[tokio::test]
async fn recovery_link_leads_to_workspace_after_new_password() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .and(header("authorization", "Bearer recovery-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "u1",
            "email": "ada@example.com"
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/auth/v1/user"))
        .and(header("authorization", "Bearer recovery-token"))
        .and(body_json(json!({ "password": "correct horse" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "u1",
            "email": "ada@example.com"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server)?;
    let redirects = client.config().redirects();
    let mut controller = AuthController::attach(&client);
    assert_eq!(controller.screen(), Screen::CredentialForm(View::SignIn));

    let link = Url::parse(
        "https://app.example.com/#access_token=recovery-token&refresh_token=r&expires_in=3600&type=recovery",
    )?;
    assert!(client.complete_redirect(&link).await?);
    controller.drain();
    assert_eq!(
        controller.screen(),
        Screen::CredentialForm(View::UpdatePassword)
    );

    let mut form = forms::for_view(View::UpdatePassword);
    assert!(form.links().is_empty());
    assert!(form.set_field(Field::Password, "correct horse".to_string()));
    let request = form
        .begin_submit(&redirects)
        .context("update password form rejected valid input")?;
    let outcome = request.dispatch(&client).await;
    let next = form.settle(outcome);
    assert_eq!(next, Some(View::SignIn));

    controller.drain();
    if let Some(view) = next {
        controller.navigate(view);
    }
    assert_eq!(controller.screen(), Screen::Workspace(ada()));
    Ok(())
}

#[tokio::test]
async fn expired_link_keeps_sign_in() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    let client = client(&server)?;
    let mut controller = AuthController::attach(&client);

    let link = Url::parse(
        "https://app.example.com/#error=access_denied&error_code=otp_expired&error_description=Email+link+is+invalid+or+has+expired",
    )?;
    let err = client
        .complete_redirect(&link)
        .await
        .expect_err("expired link must fail");
    assert_eq!(err.to_string(), "Email link is invalid or has expired");

    assert_eq!(controller.drain(), 0);
    assert_eq!(controller.screen(), Screen::CredentialForm(View::SignIn));
    Ok(())
}

#[tokio::test]
async fn sign_in_then_sign_out_twice() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .and(body_json(json!({
            "email": "ada@example.com",
            "password": "hunter22"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access-1",
            "token_type": "bearer",
            "user": { "id": "u1", "email": "ada@example.com" }
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/logout"))
        .and(header("authorization", "Bearer access-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server)?;
    let redirects = client.config().redirects();
    let mut controller = AuthController::attach(&client);

    let mut form = forms::for_view(View::SignIn);
    form.set_field(Field::Email, " ada@example.com ".to_string());
    form.set_field(Field::Password, "hunter22".to_string());
    let request = form
        .begin_submit(&redirects)
        .context("sign in form rejected valid input")?;
    let next = form.settle(request.dispatch(&client).await);
    assert_eq!(next, None);
    assert!(form.status().message().is_none());

    controller.drain();
    assert_eq!(controller.screen(), Screen::Workspace(ada()));

    client.sign_out().await?;
    client.sign_out().await?;

    assert_eq!(controller.drain(), 1);
    assert_eq!(controller.screen(), Screen::CredentialForm(View::SignIn));
    assert_eq!(client.current_session().await?, None);
    Ok(())
}
