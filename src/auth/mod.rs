//! Auth core covering the view state machine, the session event source, the
//! provider capability trait and the credential forms. It keeps authentication
//! decisions out of the terminal front end and must stay aligned with the
//! session-change reasons adapters publish. Passwords pass through here as
//! `SecretString` and must never be logged.
//!
//! Flow Overview: the controller subscribes once to the provider's session hub
//! and resolves loading on the initial snapshot. Forms validate locally, call
//! one provider operation and map the outcome into their own message slot. The
//! only way a form changes the view is an explicit navigation request.

pub mod controller;
pub mod errors;
pub mod events;
pub mod forms;
pub mod provider;
pub mod state;
#[cfg(test)]
pub(crate) mod testing;
pub mod types;

pub use controller::AuthController;
pub use errors::{CallError, ProviderError, ValidationError};
pub use events::{SessionHub, SessionSubscription};
pub use provider::IdentityProvider;
pub use state::{ControllerState, Screen};
pub use types::{
    ChangeReason, FormMessage, MessageKind, Session, SessionChangeEvent, UserIdentity, View,
};
