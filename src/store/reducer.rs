//! The reducer seam.

use crate::core::{Action, Event, State};
use crate::store::emitter::Emitter;
use async_trait::async_trait;

/// Domain transition logic for a store.
///
/// The store calls `on_dispatched` with the current snapshot, the action and
/// an [`Emitter`] for one-shot events. Returning `None` means "no transition
/// for this pairing": the snapshot is kept and nothing is published.
///
/// The reducer runs while the store's transition lock is held, so a slow
/// reducer delays every later action for that store. Any I/O it awaits is its
/// own concern, including error handling and timeouts.
///
/// Panics are treated as defects. They fail only the task running the
/// transition; the store logs them and keeps serving.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use tarte::contract;
/// use tarte::store::{Emitter, Reducer};
///
/// #[derive(Clone, PartialEq, Debug)]
/// enum Counter {
///     Idle { count: u32 },
/// }
///
/// #[derive(Clone, Debug)]
/// enum CounterAction {
///     Increment,
/// }
///
/// #[derive(Clone, Debug)]
/// enum CounterEvent {
///     Overflowed,
/// }
///
/// contract!(state Counter { Idle });
/// contract!(action CounterAction { Increment });
/// contract!(event CounterEvent { Overflowed });
///
/// struct CounterReducer;
///
/// #[async_trait]
/// impl Reducer for CounterReducer {
///     type State = Counter;
///     type Action = CounterAction;
///     type Event = CounterEvent;
///
///     async fn on_dispatched(
///         &self,
///         state: &Counter,
///         action: &CounterAction,
///         emit: &Emitter<'_, Counter, CounterAction, CounterEvent>,
///     ) -> Option<Counter> {
///         match (state, action) {
///             (Counter::Idle { count }, CounterAction::Increment) => match count.checked_add(1) {
///                 Some(count) => Some(Counter::Idle { count }),
///                 None => {
///                     emit.emit(CounterEvent::Overflowed);
///                     None
///                 }
///             },
///         }
///     }
/// }
/// ```
#[async_trait]
pub trait Reducer: Send + Sync + 'static {
    type State: State;
    type Action: Action;
    type Event: Event;

    /// Compute the next snapshot for `action` applied to `state`.
    async fn on_dispatched(
        &self,
        state: &Self::State,
        action: &Self::Action,
        emit: &Emitter<'_, Self::State, Self::Action, Self::Event>,
    ) -> Option<Self::State>;
}
