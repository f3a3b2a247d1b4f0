//! Passive observers of dispatch and event emission.

use crate::core::{Action, Event, State, StateHistory, StateTransition};
use chrono::Utc;
use std::collections::VecDeque;
use std::marker::PhantomData;
use std::sync::Mutex;
use tracing::Level;

/// Observer invoked synchronously around each transition.
///
/// Hooks run in registration order on the task running the transition,
/// while the store's transition lock is held. They must not mutate the
/// store and must not call back into `dispatch` synchronously.
///
/// Every hook defaults to a no-op.
pub trait Middleware<S, A, E>: Send + Sync {
    /// An action is about to be reduced against `state`.
    fn on_dispatched(&self, _state: &S, _action: &A) {}

    /// The reducer emitted `event` while reducing `action` against `state`.
    fn on_event_emitted(&self, _state: &S, _action: &A, _event: &E) {}

    /// The store is leaving `state`'s variant. Runs after the exit action
    /// was reduced and before the new snapshot is published.
    fn on_state_exited(&self, _state: &S) {}

    /// `next` was published in place of `prev`.
    fn on_state_changed(&self, _prev: &S, _action: &A, _next: &S) {}

    /// The store entered a new variant with `state`.
    fn on_state_entered(&self, _state: &S) {}
}

/// Logs every hook through `tracing`.
pub struct TracingMiddleware<S, A, E> {
    level: Level,
    _phantom: PhantomData<fn() -> (S, A, E)>,
}

impl<S, A, E> TracingMiddleware<S, A, E> {
    /// Log at `DEBUG`.
    pub fn new() -> Self {
        Self::with_level(Level::DEBUG)
    }

    pub fn with_level(level: Level) -> Self {
        Self {
            level,
            _phantom: PhantomData,
        }
    }
}

impl<S, A, E> Default for TracingMiddleware<S, A, E> {
    fn default() -> Self {
        Self::new()
    }
}

// `tracing` macros need a constant level, so fan out once here.
macro_rules! log_at {
    ($level:expr, $($arg:tt)+) => {{
        let level = $level;
        if level == Level::ERROR {
            tracing::error!($($arg)+)
        } else if level == Level::WARN {
            tracing::warn!($($arg)+)
        } else if level == Level::INFO {
            tracing::info!($($arg)+)
        } else if level == Level::DEBUG {
            tracing::debug!($($arg)+)
        } else {
            tracing::trace!($($arg)+)
        }
    }};
}

impl<S: State, A: Action, E: Event> Middleware<S, A, E> for TracingMiddleware<S, A, E> {
    fn on_dispatched(&self, state: &S, action: &A) {
        log_at!(self.level, state = state.name(), action = ?action, "action dispatched");
    }

    fn on_event_emitted(&self, state: &S, action: &A, event: &E) {
        log_at!(
            self.level,
            state = state.name(),
            action = action.name(),
            event = ?event,
            "event emitted"
        );
    }

    fn on_state_exited(&self, state: &S) {
        log_at!(self.level, state = state.name(), "state exited");
    }

    fn on_state_changed(&self, prev: &S, action: &A, next: &S) {
        log_at!(
            self.level,
            from = prev.name(),
            action = action.name(),
            to = ?next,
            "state updated"
        );
    }

    fn on_state_entered(&self, state: &S) {
        log_at!(self.level, state = state.name(), "state entered");
    }
}

/// Records every published state change into a [`StateHistory`].
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use tarte::contract;
/// use tarte::store::{HistoryMiddleware, Middleware};
///
/// #[derive(Clone, PartialEq, Debug)]
/// enum Phase { A, B }
/// #[derive(Clone, Debug)]
/// enum Go { Next }
/// #[derive(Clone, Debug)]
/// enum Note { Logged }
///
/// contract!(state Phase { A, B });
/// contract!(action Go { Next });
/// contract!(event Note { Logged });
///
/// let history = Arc::new(HistoryMiddleware::<Phase>::new());
/// let hook: &dyn Middleware<Phase, Go, Note> = history.as_ref();
/// hook.on_state_changed(&Phase::A, &Go::Next, &Phase::B);
///
/// assert_eq!(history.snapshot().variant_path(), vec!["A", "B"]);
/// ```
pub struct HistoryMiddleware<S> {
    transitions: Mutex<VecDeque<StateTransition<S>>>,
    limit: Option<usize>,
}

impl<S: State> HistoryMiddleware<S> {
    /// Record every change, without bound.
    pub fn new() -> Self {
        Self {
            transitions: Mutex::new(VecDeque::new()),
            limit: None,
        }
    }

    /// Keep only the most recent `limit` changes.
    pub fn with_capacity_limit(limit: usize) -> Self {
        Self {
            transitions: Mutex::new(VecDeque::with_capacity(limit)),
            limit: Some(limit),
        }
    }

    /// The history recorded so far, oldest first.
    pub fn snapshot(&self) -> StateHistory<S> {
        let transitions = match self.transitions.lock() {
            Ok(transitions) => transitions,
            Err(poisoned) => poisoned.into_inner(),
        };
        transitions.iter().cloned().collect()
    }
}

impl<S: State> Default for HistoryMiddleware<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State, A: Action, E: Event> Middleware<S, A, E> for HistoryMiddleware<S> {
    fn on_state_changed(&self, prev: &S, action: &A, next: &S) {
        if self.limit == Some(0) {
            return;
        }
        let transition = StateTransition {
            from: prev.clone(),
            to: next.clone(),
            action: action.name().to_string(),
            timestamp: Utc::now(),
        };
        let mut transitions = match self.transitions.lock() {
            Ok(transitions) => transitions,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(limit) = self.limit {
            while transitions.len() >= limit {
                transitions.pop_front();
            }
        }
        transitions.push_back(transition);
    }
}
