//! In-process session event source. Provider adapters embed a [`SessionHub`]
//! and publish every session change through it; consumers hold a scoped
//! [`SessionSubscription`] that always starts with the current snapshot.
//!
//! The snapshot is queued while the subscriber table is locked, so no change
//! published concurrently can slip between the snapshot and registration.

use crate::auth::types::{ChangeReason, Session, SessionChangeEvent};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender, error::TryRecvError};
use tracing::{debug, trace};

#[derive(Default)]
struct HubState {
    current: Session,
    next_id: u64,
    subscribers: HashMap<u64, UnboundedSender<SessionChangeEvent>>,
}

#[derive(Default)]
struct HubInner {
    state: Mutex<HubState>,
}

impl HubInner {
    fn lock(&self) -> MutexGuard<'_, HubState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Clone, Default)]
/// Fan-out point for session changes.
pub struct SessionHub {
    inner: Arc<HubInner>,
}

impl SessionHub {
    #[must_use]
    pub fn new(initial: Session) -> Self {
        let hub = Self::default();
        hub.inner.lock().current = initial;
        hub
    }

    /// Latest published session.
    #[must_use]
    pub fn current(&self) -> Session {
        self.inner.lock().current.clone()
    }

    /// Records the new session and delivers the change to every subscriber.
    pub fn publish(&self, reason: ChangeReason, session: Session) {
        let mut state = self.inner.lock();
        state.current.clone_from(&session);

        let event = SessionChangeEvent::new(reason, session);
        state
            .subscribers
            .retain(|_, sender| sender.send(event.clone()).is_ok());

        debug!(
            ?reason,
            signed_in = event.session.is_some(),
            subscribers = state.subscribers.len(),
            "session change published"
        );
    }

    /// Registers a subscriber whose first event is the current snapshot,
    /// tagged `Initial`.
    #[must_use]
    pub fn subscribe(&self) -> SessionSubscription {
        let (sender, receiver) = mpsc::unbounded_channel();
        let mut state = self.inner.lock();

        let id = state.next_id;
        state.next_id += 1;

        // the receiver is still in scope, so this send cannot fail
        let _ = sender.send(SessionChangeEvent::new(
            ChangeReason::Initial,
            state.current.clone(),
        ));
        state.subscribers.insert(id, sender);

        trace!(id, "session subscriber registered");

        SessionSubscription {
            id,
            receiver,
            hub: Arc::downgrade(&self.inner),
        }
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().subscribers.len()
    }
}

/// Scoped handle on a [`SessionHub`]; dropping it unsubscribes.
pub struct SessionSubscription {
    id: u64,
    receiver: UnboundedReceiver<SessionChangeEvent>,
    hub: Weak<HubInner>,
}

impl SessionSubscription {
    /// Waits for the next session change. Returns `None` once the hub is gone
    /// and every queued event has been consumed.
    pub async fn recv(&mut self) -> Option<SessionChangeEvent> {
        self.receiver.recv().await
    }

    /// Returns an already queued event without waiting.
    pub fn try_recv(&mut self) -> Option<SessionChangeEvent> {
        match self.receiver.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }
}

impl Drop for SessionSubscription {
    fn drop(&mut self) {
        if let Some(hub) = self.hub.upgrade() {
            hub.lock().subscribers.remove(&self.id);
            trace!(id = self.id, "session subscriber released");
        }
    }
}
