//! Terminal front end. One task owns the controller and the mounted form and
//! reacts, in turn, to session changes, typed commands and the outcomes of
//! provider calls running on spawned tasks.
//!
//! Every mounted form gets a fresh ULID. Outcomes carry the id of the form that
//! issued them, so a reply for a form that has since been replaced (the user
//! navigated away, or signed in) is dropped instead of landing on the wrong
//! form.

pub mod input;
pub mod render;

use crate::{
    auth::{
        controller::AuthController,
        errors::CallError,
        forms::{self, CredentialForm, SubmitRejected},
        provider::IdentityProvider,
        state::Screen,
        types::Session,
    },
    config::Redirects,
};
use anyhow::{Context, Result};
use input::Command;
use std::sync::Arc;
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt},
    sync::mpsc,
};
use std::time::Duration;
use tracing::{debug, info, warn};
use ulid::Ulid;

const LINK_RATE_LIMITED: &str = "Too many requests. Please wait a moment before opening the link again.";
const LINK_UNEXPECTED: &str = "The link could not be completed. Please try again.";

/// How long end of input waits for provider calls that are still running.
const PENDING_GRACE: Duration = Duration::from_secs(10);

#[derive(Debug)]
pub enum Outcome {
    Form {
        form_id: Ulid,
        result: Result<(), CallError>,
    },
    SignOut(Result<(), CallError>),
    Link(Result<bool, CallError>),
    Refresh(Result<Session, CallError>),
}

#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

struct MountedForm {
    id: Ulid,
    form: Box<dyn CredentialForm>,
}

pub struct App {
    provider: Arc<dyn IdentityProvider>,
    redirects: Redirects,
    controller: AuthController,
    mounted: Option<MountedForm>,
    notice: Option<String>,
    in_flight: usize,
    outcome_tx: mpsc::UnboundedSender<Outcome>,
    outcome_rx: mpsc::UnboundedReceiver<Outcome>,
}

impl App {
    /// Attaches a controller to `provider` and mounts the first form.
    #[must_use]
    pub fn new(provider: Arc<dyn IdentityProvider>, redirects: Redirects) -> Self {
        let controller = AuthController::attach(provider.as_ref());
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();

        let mut app = Self {
            provider,
            redirects,
            controller,
            mounted: None,
            notice: None,
            in_flight: 0,
            outcome_tx,
            outcome_rx,
        };
        app.sync_form();
        app
    }

    #[must_use]
    pub fn screen(&self) -> Screen {
        self.controller.screen()
    }

    #[must_use]
    pub fn form(&self) -> Option<&dyn CredentialForm> {
        self.mounted.as_ref().map(|mounted| mounted.form.as_ref())
    }

    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    #[must_use]
    pub fn render(&self) -> String {
        render::screen(&self.screen(), self.form(), self.notice())
    }

    /// Runs until `quit`, end of input, Ctrl-C or the provider shutting down.
    /// At end of input, calls still running get a bounded wait so their
    /// outcome is shown before returning.
    ///
    /// # Errors
    /// Returns an error if reading input or writing output fails.
    pub async fn run<R, W>(mut self, input: R, mut output: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);
        self.write_screen(&mut output).await?;

        loop {
            tokio::select! {
                screen = self.controller.next_event() => {
                    if screen.is_none() {
                        warn!("session events closed");
                        break;
                    }
                    self.apply_session_changes();
                }
                Some(outcome) = self.outcome_rx.recv() => self.apply_outcome(outcome),
                line = lines.next_line() => {
                    let Some(line) = line.context("failed to read input")? else {
                        debug!(pending = self.in_flight, "end of input");
                        self.settle_pending(&mut output).await?;
                        break;
                    };
                    if self.handle_line(&line) == Flow::Quit {
                        break;
                    }
                }
                _ = &mut ctrl_c => {
                    info!("interrupted");
                    break;
                }
            }

            self.write_screen(&mut output).await?;
        }

        Ok(())
    }

    /// Parses and handles one input line.
    pub fn handle_line(&mut self, line: &str) -> Flow {
        match input::parse(line) {
            Ok(Some(command)) => self.handle_command(command),
            Ok(None) => Flow::Continue,
            Err(err) => {
                self.notice = Some(err.to_string());
                Flow::Continue
            }
        }
    }

    pub fn handle_command(&mut self, command: Command) -> Flow {
        self.notice = None;

        match command {
            Command::Set(field, value) => {
                let accepted = self
                    .mounted
                    .as_mut()
                    .is_some_and(|mounted| mounted.form.set_field(field, value));
                if !accepted {
                    self.notice = Some(format!("No {} field here.", field.label()));
                }
            }
            Command::Submit => self.submit(),
            Command::Go(view) => {
                let offered = self
                    .mounted
                    .as_ref()
                    .is_some_and(|mounted| mounted.form.offers(view));
                if offered {
                    self.controller.navigate(view);
                    self.sync_form();
                } else {
                    self.notice = Some(format!("No link to {view} from here."));
                }
            }
            Command::Link(link) => {
                let provider = Arc::clone(&self.provider);
                self.spawn(async move { Outcome::Link(provider.complete_redirect(&link).await) });
            }
            Command::Refresh => {
                let provider = Arc::clone(&self.provider);
                self.spawn(async move { Outcome::Refresh(provider.current_session().await) });
            }
            Command::SignOut => {
                if matches!(self.screen(), Screen::Workspace(_)) {
                    let provider = Arc::clone(&self.provider);
                    self.spawn(async move { Outcome::SignOut(provider.sign_out().await) });
                } else {
                    self.notice = Some("Not signed in.".to_string());
                }
            }
            Command::Help => self.notice = Some(input::HELP.to_string()),
            Command::Quit => return Flow::Quit,
        }

        Flow::Continue
    }

    /// Applies the result of a provider call started from this app.
    pub fn apply_outcome(&mut self, outcome: Outcome) {
        self.in_flight = self.in_flight.saturating_sub(1);

        match outcome {
            Outcome::Form { form_id, result } => {
                let Some(mounted) = self.mounted.as_mut().filter(|m| m.id == form_id) else {
                    debug!(%form_id, "discarding outcome for a form that is no longer mounted");
                    return;
                };
                if let Some(view) = mounted.form.settle(result) {
                    self.controller.navigate(view);
                }
                self.sync_form();
            }
            Outcome::SignOut(Err(err)) => {
                warn!("sign out failed: {err}");
                self.notice = Some(format!("Sign out failed: {err}"));
            }
            Outcome::SignOut(Ok(())) => {}
            Outcome::Link(Ok(true)) => {}
            Outcome::Link(Ok(false)) => {
                self.notice = Some("That link has nothing to complete.".to_string());
            }
            Outcome::Link(Err(err)) => {
                warn!("redirect link failed: {err}");
                self.notice = Some(forms::error_text(&err, LINK_RATE_LIMITED, LINK_UNEXPECTED));
            }
            Outcome::Refresh(Ok(session)) => {
                self.notice = Some(match session.as_ref().and_then(|user| user.email.as_deref()) {
                    Some(email) => format!("Provider session: {email}"),
                    None if session.is_some() => "Provider session: active".to_string(),
                    None => "Provider session: none".to_string(),
                });
            }
            Outcome::Refresh(Err(err)) => {
                warn!("session lookup failed: {err}");
                self.notice = Some(format!("Session lookup failed: {err}"));
            }
        }
    }

    /// Applies queued session changes and remounts the form if the screen moved.
    pub fn apply_session_changes(&mut self) {
        self.controller.drain();
        self.sync_form();
    }

    fn submit(&mut self) {
        let Some(mounted) = self.mounted.as_mut() else {
            self.notice = Some("Nothing to submit here.".to_string());
            return;
        };

        match mounted.form.begin_submit(&self.redirects) {
            Ok(request) => {
                let form_id = mounted.id;
                let provider = Arc::clone(&self.provider);
                self.spawn(async move {
                    let result = request.dispatch(provider.as_ref()).await;
                    Outcome::Form { form_id, result }
                });
            }
            Err(SubmitRejected::Invalid(err)) => debug!("submission rejected: {err}"),
            Err(err) => self.notice = Some(format!("Cannot submit: {err}.")),
        }
    }

    fn spawn<F>(&mut self, task: F)
    where
        F: std::future::Future<Output = Outcome> + Send + 'static,
    {
        self.in_flight += 1;
        let outcome_tx = self.outcome_tx.clone();
        tokio::spawn(async move {
            // The receiver only goes away when the app is shutting down.
            let _ = outcome_tx.send(task.await);
        });
    }

    /// Keeps the mounted form in step with the screen. A form is replaced only
    /// when the view changes, so its input and message survive session events.
    fn sync_form(&mut self) {
        match self.controller.screen() {
            Screen::CredentialForm(view) => {
                if self.mounted.as_ref().map(|m| m.form.view()) != Some(view) {
                    let id = Ulid::new();
                    debug!(%view, form_id = %id, "mounting form");
                    self.mounted = Some(MountedForm {
                        id,
                        form: forms::for_view(view),
                    });
                }
            }
            Screen::Loading | Screen::Workspace(_) => self.mounted = None,
        }
    }

    /// Applies outcomes of calls still running, until none is left or
    /// [`PENDING_GRACE`] runs out, then shows the final screen.
    async fn settle_pending<W: AsyncWrite + Unpin>(&mut self, output: &mut W) -> Result<()> {
        let deadline = tokio::time::Instant::now() + PENDING_GRACE;

        while self.in_flight > 0 {
            let Ok(Some(outcome)) = tokio::time::timeout_at(deadline, self.outcome_rx.recv()).await
            else {
                warn!(pending = self.in_flight, "leaving with provider calls still running");
                break;
            };
            self.apply_outcome(outcome);
        }

        self.apply_session_changes();
        self.write_screen(output).await
    }

    async fn write_screen<W: AsyncWrite + Unpin>(&self, output: &mut W) -> Result<()> {
        let text = format!("\n{}\n> ", self.render());
        output.write_all(text.as_bytes()).await?;
        output.flush().await?;
        Ok(())
    }
}
