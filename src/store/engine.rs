//! The store: dispatch queue, transition lock and enter/exit cascade.

use crate::core::Contract;
use crate::store::emitter::Emitter;
use crate::store::error::DispatchError;
use crate::store::middleware::Middleware;
use crate::store::reducer::Reducer;
use crate::store::scope::Scope;
use crate::store::subscription::{EventSubscription, StateSubscription};
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, oneshot, watch, Mutex};
use tokio::task::JoinHandle;
use tracing::Instrument;
use uuid::Uuid;

type StateOf<R> = <R as Reducer>::State;
type ActionOf<R> = <R as Reducer>::Action;
type EventOf<R> = <R as Reducer>::Event;

pub(crate) type MiddlewareList<R> =
    Vec<Arc<dyn Middleware<StateOf<R>, ActionOf<R>, EventOf<R>>>>;

/// Identifies one store instance in logs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StoreId(Uuid);

impl StoreId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Everything `StoreBuilder` hands over to start a store.
pub(crate) struct StoreParts<R: Reducer> {
    pub initial: StateOf<R>,
    pub reducer: R,
    pub enter_action: Option<ActionOf<R>>,
    pub exit_action: Option<ActionOf<R>>,
    pub middleware: MiddlewareList<R>,
    pub scope: Scope,
    pub event_capacity: usize,
    pub max_cascade_depth: usize,
}

type Reply<S> = oneshot::Sender<Result<S, DispatchError>>;

enum Job<S, A> {
    Dispatch { action: A, reply: Option<Reply<S>> },
    Barrier(oneshot::Sender<()>),
}

/// Write side of both channels. Only reachable through the transition lock.
struct Writer<S, E> {
    state: watch::Sender<S>,
    events: broadcast::Sender<E>,
}

struct Inner<R: Reducer> {
    id: StoreId,
    reducer: R,
    enter_action: Option<ActionOf<R>>,
    exit_action: Option<ActionOf<R>>,
    middleware: MiddlewareList<R>,
    max_cascade_depth: usize,
    scope: Scope,
    writer: Mutex<Option<Writer<StateOf<R>, EventOf<R>>>>,
    state: watch::Receiver<StateOf<R>>,
    // Template for `event_channel`. Subscribers only see events sent after
    // they resubscribe, so nothing buffered here is ever replayed.
    events: broadcast::Receiver<EventOf<R>>,
}

/// Outcome of a single reduce-and-publish step.
enum Step {
    Kept,
    Updated,
    Entered,
}

/// A single-writer reactive store.
///
/// Actions are queued by [`dispatch`](Self::dispatch) and reduced one at a
/// time, in the order they were queued, by a driver task running in the
/// store's [`Scope`]. Each transition holds the store's lock for its whole
/// duration, including every step of an enter cascade, so a cascade
/// completes before the next queued action is looked at.
///
/// Dropping the store disposes it.
pub struct Store<R: Reducer> {
    inner: Arc<Inner<R>>,
    jobs: mpsc::UnboundedSender<Job<StateOf<R>, ActionOf<R>>>,
}

impl<R: Reducer> Store<R> {
    pub(crate) fn start(parts: StoreParts<R>) -> Self {
        let StoreParts {
            initial,
            reducer,
            enter_action,
            exit_action,
            middleware,
            scope,
            event_capacity,
            max_cascade_depth,
        } = parts;

        let id = StoreId::new();
        let (state_tx, state_rx) = watch::channel(initial);
        let (event_tx, event_rx) = broadcast::channel(event_capacity);
        let (jobs_tx, jobs_rx) = mpsc::unbounded_channel();

        let inner = Arc::new(Inner {
            id,
            reducer,
            enter_action,
            exit_action,
            middleware,
            max_cascade_depth,
            scope: scope.child(),
            writer: Mutex::new(Some(Writer {
                state: state_tx,
                events: event_tx,
            })),
            state: state_rx,
            events: event_rx,
        });

        tracing::info!(
            store = %id,
            initial = inner.state.borrow().name(),
            middleware = inner.middleware.len(),
            "store started"
        );

        inner
            .scope
            .handle()
            .spawn(Arc::clone(&inner).drive(jobs_rx));

        let store = Self {
            inner,
            jobs: jobs_tx,
        };
        if let Some(enter) = store.inner.enter_action.clone() {
            store.enqueue(Job::Dispatch {
                action: enter,
                reply: None,
            });
        }
        store
    }

    pub fn id(&self) -> StoreId {
        self.inner.id
    }

    /// The latest published snapshot. Never blocks on a running transition.
    pub fn current_state(&self) -> StateOf<R> {
        self.inner.state.borrow().clone()
    }

    /// Subscribe to published snapshots, starting with the current one.
    pub fn state_channel(&self) -> StateSubscription<StateOf<R>> {
        StateSubscription::new(self.inner.state.clone())
    }

    /// Subscribe to events emitted from now on.
    pub fn event_channel(&self) -> EventSubscription<EventOf<R>> {
        EventSubscription::new(self.inner.events.resubscribe())
    }

    /// Queue `action` and return immediately.
    ///
    /// A no-op once the store has been disposed.
    pub fn dispatch(&self, action: ActionOf<R>) {
        self.enqueue(Job::Dispatch {
            action,
            reply: None,
        });
    }

    /// Queue `action` and wait until it and its enter cascade have settled.
    ///
    /// Resolves to the snapshot current when the transition finished.
    pub async fn dispatch_and_wait(
        &self,
        action: ActionOf<R>,
    ) -> Result<StateOf<R>, DispatchError> {
        let (reply, done) = oneshot::channel();
        if !self.enqueue(Job::Dispatch {
            action,
            reply: Some(reply),
        }) {
            return Err(DispatchError::Disposed);
        }
        done.await.unwrap_or(Err(DispatchError::Disposed))
    }

    /// Wait until every action queued before this call has been handled.
    pub async fn flush(&self) -> Result<(), DispatchError> {
        let (tx, done) = oneshot::channel();
        if !self.enqueue(Job::Barrier(tx)) {
            return Err(DispatchError::Disposed);
        }
        done.await.map_err(|_| DispatchError::Disposed)
    }

    /// Forward snapshots and events to callbacks until the store is disposed.
    ///
    /// Snapshot delivery starts with the current state.
    pub fn collect<F, G>(&self, mut on_state: F, mut on_event: G) -> JoinHandle<()>
    where
        F: FnMut(StateOf<R>) + Send + 'static,
        G: FnMut(EventOf<R>) + Send + 'static,
    {
        let mut states = self.state_channel();
        let mut events = self.event_channel();
        let token = self.inner.scope.token().clone();
        self.inner.scope.handle().spawn(async move {
            let mut states_open = true;
            let mut events_open = true;
            while states_open || events_open {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    state = states.next(), if states_open => match state {
                        Some(state) => on_state(state),
                        None => states_open = false,
                    },
                    event = events.next(), if events_open => match event {
                        Some(event) => on_event(event),
                        None => events_open = false,
                    },
                }
            }
        })
    }

    /// Cancel pending and future work. Idempotent.
    ///
    /// A transition in flight is abandoned at its next suspension point and
    /// publishes nothing further; both channels close once it has let go of
    /// the lock.
    pub fn dispose(&self) {
        if !self.inner.scope.is_cancelled() {
            tracing::info!(store = %self.inner.id, "store disposed");
            self.inner.scope.cancel();
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.scope.is_cancelled()
    }

    fn enqueue(&self, job: Job<StateOf<R>, ActionOf<R>>) -> bool {
        if self.is_disposed() {
            tracing::trace!(store = %self.inner.id, "dispatch after dispose ignored");
            return false;
        }
        self.jobs.send(job).is_ok()
    }
}

impl<R: Reducer> Drop for Store<R> {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl<R: Reducer> fmt::Debug for Store<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("id", &self.inner.id)
            .field("state", &*self.inner.state.borrow())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

impl<R: Reducer> Inner<R> {
    /// Drain the job queue in order until disposal.
    async fn drive(self: Arc<Self>, mut jobs: mpsc::UnboundedReceiver<Job<StateOf<R>, ActionOf<R>>>) {
        let token = self.scope.token().clone();
        loop {
            let job = tokio::select! {
                biased;
                _ = token.cancelled() => break,
                job = jobs.recv() => match job {
                    Some(job) => job,
                    None => break,
                },
            };

            match job {
                Job::Barrier(done) => {
                    let _ = done.send(());
                }
                Job::Dispatch { action, reply } => {
                    let result = Arc::clone(&self).run(action).await;
                    if let Some(reply) = reply {
                        let _ = reply.send(result);
                    }
                }
            }
        }

        jobs.close();
        // Dropping the senders closes both channels for subscribers.
        self.writer.lock().await.take();
        tracing::debug!(store = %self.id, "store driver stopped");
    }

    /// Run one dispatched action to a fixed point in its own task, so a
    /// panicking reducer fails only that task.
    async fn run(self: Arc<Self>, action: ActionOf<R>) -> Result<StateOf<R>, DispatchError> {
        let name = action.name().to_string();
        let span = tracing::debug_span!("transition", store = %self.id, action = %name);
        let task = self
            .scope
            .spawn(Arc::clone(&self).transition(action).instrument(span));

        match task.await {
            Ok(Some(Ok(state))) => Ok(state),
            Ok(Some(Err(err))) => {
                tracing::error!(store = %self.id, action = %name, error = %err, "transition failed");
                Err(err)
            }
            Ok(None) => {
                tracing::debug!(store = %self.id, action = %name, "transition abandoned on dispose");
                Err(DispatchError::Disposed)
            }
            Err(join) if join.is_panic() => {
                let message = panic_message(join.into_panic());
                tracing::error!(store = %self.id, action = %name, panic = %message, "reducer panicked");
                Err(DispatchError::ReducerPanicked {
                    action: name,
                    message,
                })
            }
            Err(_) => Err(DispatchError::Disposed),
        }
    }

    /// Hold the lock across the reduce step and every enter step that
    /// follows it.
    async fn transition(self: Arc<Self>, action: ActionOf<R>) -> Result<StateOf<R>, DispatchError> {
        let guard = self.writer.lock().await;
        let Some(writer) = (*guard).as_ref() else {
            return Err(DispatchError::Disposed);
        };

        let mut step = self.step(writer, &action).await?;
        let mut depth = 0;
        while let (Step::Entered, Some(enter)) = (&step, &self.enter_action) {
            if depth == self.max_cascade_depth {
                return Err(DispatchError::CascadeLimitExceeded {
                    limit: self.max_cascade_depth,
                    state: writer.state.borrow().name().to_string(),
                });
            }
            depth += 1;
            step = self.step(writer, enter).await?;
        }

        let settled = writer.state.borrow().clone();
        Ok(settled)
    }

    /// Reduce `action` against the current snapshot, run the exit action on
    /// a variant change, and publish.
    async fn step(
        &self,
        writer: &Writer<StateOf<R>, EventOf<R>>,
        action: &ActionOf<R>,
    ) -> Result<Step, DispatchError> {
        let prev = writer.state.borrow().clone();
        for middleware in &self.middleware {
            middleware.on_dispatched(&prev, action);
        }

        let emitter = Emitter::new(&prev, action, &writer.events, &self.middleware);
        let Some(next) = self.reducer.on_dispatched(&prev, action, &emitter).await else {
            tracing::trace!(state = prev.name(), "no transition");
            return Ok(Step::Kept);
        };

        let entered = !prev.same_variant(&next);
        if entered {
            if let Some(exit) = &self.exit_action {
                // Exit events are attributed to the action that caused the exit.
                let _ = self.reducer.on_dispatched(&prev, exit, &emitter).await;
            }
            for middleware in &self.middleware {
                middleware.on_state_exited(&prev);
            }
        }

        if self.scope.is_cancelled() {
            return Err(DispatchError::Disposed);
        }

        let published = writer.state.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next.clone();
                true
            }
        });
        if published {
            for middleware in &self.middleware {
                middleware.on_state_changed(&prev, action, &next);
            }
        }

        if !entered {
            return Ok(if published { Step::Updated } else { Step::Kept });
        }

        tracing::debug!(from = prev.name(), to = next.name(), "variant changed");
        for middleware in &self.middleware {
            middleware.on_state_entered(&next);
        }
        Ok(Step::Entered)
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
