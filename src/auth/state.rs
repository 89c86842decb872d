//! View state machine. It owns `{ current_view, current_user, is_loading }`,
//! consumes session changes and navigation requests, and derives the screen to
//! render. The recovery view outranks an existing session: a user who followed
//! a reset link is authenticated but must set a new password before reaching
//! the workspace.

use crate::auth::types::{ChangeReason, Session, SessionChangeEvent, UserIdentity, View};
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Eq)]
/// What the front end renders for a given state.
pub enum Screen {
    Loading,
    Workspace(UserIdentity),
    CredentialForm(View),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ControllerState {
    current_view: View,
    current_user: Session,
    is_loading: bool,
}

impl Default for ControllerState {
    fn default() -> Self {
        Self::new()
    }
}

impl ControllerState {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            current_view: View::SignIn,
            current_user: None,
            is_loading: true,
        }
    }

    #[must_use]
    pub const fn current_view(&self) -> View {
        self.current_view
    }

    #[must_use]
    pub const fn current_user(&self) -> Option<&UserIdentity> {
        self.current_user.as_ref()
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Applies one session change.
    pub fn apply(&mut self, event: SessionChangeEvent) {
        self.current_user = event.session;

        match event.reason {
            ChangeReason::Initial => self.is_loading = false,
            ChangeReason::PasswordRecovery => self.current_view = View::UpdatePassword,
            ChangeReason::SignedIn | ChangeReason::SignedOut | ChangeReason::Other => {}
        }
    }

    /// Whether a navigation request would be honored right now.
    #[must_use]
    pub fn accepts_navigation(&self) -> bool {
        self.current_user.is_none() || self.current_view == View::UpdatePassword
    }

    /// Handles a form's "switch to X" request. Returns `false` when the
    /// workspace owns the screen and the request is ignored.
    pub fn set_view(&mut self, view: View) -> bool {
        if !self.accepts_navigation() {
            debug!(requested = %view, "navigation ignored while workspace is active");
            return false;
        }

        self.current_view = view;
        true
    }

    #[must_use]
    pub fn screen(&self) -> Screen {
        if self.is_loading {
            return Screen::Loading;
        }

        match &self.current_user {
            Some(user) if self.current_view != View::UpdatePassword => {
                Screen::Workspace(user.clone())
            }
            _ => Screen::CredentialForm(self.current_view),
        }
    }
}
