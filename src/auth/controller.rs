//! Auth controller: the single writer of [`ControllerState`]. It subscribes to
//! the provider exactly once when attached and releases the subscription when
//! dropped, whichever way the front end tears it down.

use crate::auth::{
    events::SessionSubscription,
    provider::IdentityProvider,
    state::{ControllerState, Screen},
    types::View,
};
use tracing::{debug, instrument};

pub struct AuthController {
    state: ControllerState,
    subscription: SessionSubscription,
}

impl AuthController {
    /// Subscribes to `provider` and applies the initial snapshot, which the
    /// subscription always queues first, so loading is resolved on return.
    pub fn attach(provider: &dyn IdentityProvider) -> Self {
        let mut controller = Self {
            state: ControllerState::new(),
            subscription: provider.subscribe(),
        };
        controller.drain();
        controller
    }

    #[must_use]
    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    #[must_use]
    pub fn screen(&self) -> Screen {
        self.state.screen()
    }

    /// Waits for the next session change and applies it. Returns `None` when the
    /// event source has shut down.
    #[instrument(level = "debug", skip(self))]
    pub async fn next_event(&mut self) -> Option<Screen> {
        let event = self.subscription.recv().await?;
        debug!(reason = ?event.reason, "applying session change");
        self.state.apply(event);
        Some(self.state.screen())
    }

    /// Applies every queued session change without waiting.
    pub fn drain(&mut self) -> usize {
        let mut applied = 0;
        while let Some(event) = self.subscription.try_recv() {
            debug!(reason = ?event.reason, "applying session change");
            self.state.apply(event);
            applied += 1;
        }
        applied
    }

    /// Navigation request issued by a credential form.
    pub fn navigate(&mut self, view: View) -> bool {
        self.state.set_view(view)
    }
}
