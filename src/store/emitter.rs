//! Event emission from inside a reducer.

use crate::core::{Action, Event, State};
use crate::store::middleware::Middleware;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Handle a reducer uses to emit one-shot events.
///
/// Emission is synchronous: the event is broadcast to current subscribers,
/// then every middleware's `on_event_emitted` hook runs in registration
/// order, all before the reducer regains control.
///
/// Middleware is told about the dispatched action. While the exit action is
/// reduced this is still the action that caused the variant change, not the
/// exit action itself.
pub struct Emitter<'a, S, A, E> {
    state: &'a S,
    action: &'a A,
    events: &'a broadcast::Sender<E>,
    middleware: &'a [Arc<dyn Middleware<S, A, E>>],
}

impl<'a, S: State, A: Action, E: Event> Emitter<'a, S, A, E> {
    pub(crate) fn new(
        state: &'a S,
        action: &'a A,
        events: &'a broadcast::Sender<E>,
        middleware: &'a [Arc<dyn Middleware<S, A, E>>],
    ) -> Self {
        Self {
            state,
            action,
            events,
            middleware,
        }
    }

    /// Broadcast `event` and notify middleware.
    pub fn emit(&self, event: E) {
        // The store holds a receiver for resubscribing, so this cannot fail
        // while the store is alive.
        let _ = self.events.send(event.clone());
        for middleware in self.middleware {
            middleware.on_event_emitted(self.state, self.action, &event);
        }
    }

    /// The snapshot the running reducer call was given.
    pub fn state(&self) -> &S {
        self.state
    }

    /// The dispatched action this reduction belongs to.
    pub fn action(&self) -> &A {
        self.action
    }
}
