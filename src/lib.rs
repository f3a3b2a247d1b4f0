//! Tarte: a single-writer reactive store
//!
//! Tarte mediates between a UI layer and business logic through three closed
//! sets of messages. Callers dispatch **actions**; a user-supplied reducer
//! turns the current **state** and an action into the next state and may
//! emit one-shot **events**. The store serializes every transition, runs
//! enter/exit actions when the state's variant changes, and broadcasts
//! results on two independent channels.
//!
//! # Core Concepts
//!
//! - **Contract**: closed enums for states, actions and events (`contract!`)
//! - **Reducer**: `(state, action, emit) -> Option<state>`, may await
//! - **Store**: queue, lock, enter/exit cascade, state and event channels
//! - **Middleware**: synchronous observers for logging and analytics
//! - **History**: immutable record of published state changes
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use tarte::contract;
//! use tarte::store::{Emitter, Reducer, Store};
//!
//! #[derive(Clone, PartialEq, Debug)]
//! enum Screen {
//!     Initial,
//!     Stable { clicks: u32 },
//! }
//!
//! #[derive(Clone, Debug)]
//! enum ScreenAction {
//!     Enter,
//!     Click,
//! }
//!
//! #[derive(Clone, Debug, PartialEq)]
//! enum ScreenEvent {
//!     ShowToast(String),
//! }
//!
//! contract!(state Screen { Initial, Stable });
//! contract!(action ScreenAction { Enter, Click });
//! contract!(event ScreenEvent { ShowToast });
//!
//! struct ScreenReducer;
//!
//! #[async_trait]
//! impl Reducer for ScreenReducer {
//!     type State = Screen;
//!     type Action = ScreenAction;
//!     type Event = ScreenEvent;
//!
//!     async fn on_dispatched(
//!         &self,
//!         state: &Screen,
//!         action: &ScreenAction,
//!         emit: &Emitter<'_, Screen, ScreenAction, ScreenEvent>,
//!     ) -> Option<Screen> {
//!         match (state, action) {
//!             (Screen::Initial, ScreenAction::Enter) => Some(Screen::Stable { clicks: 0 }),
//!             (Screen::Stable { clicks }, ScreenAction::Click) => {
//!                 emit.emit(ScreenEvent::ShowToast("clicked".into()));
//!                 Some(Screen::Stable { clicks: clicks + 1 })
//!             }
//!             _ => None,
//!         }
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let store = Store::builder(ScreenReducer, Screen::Initial)
//!     .enter_action(ScreenAction::Enter)
//!     .build()
//!     .unwrap();
//!
//! let mut events = store.event_channel();
//! let state = store.dispatch_and_wait(ScreenAction::Click).await.unwrap();
//!
//! assert_eq!(state, Screen::Stable { clicks: 1 });
//! assert_eq!(events.next().await, Some(ScreenEvent::ShowToast("clicked".into())));
//! # }
//! ```

pub mod builder;
pub mod core;
pub mod store;

// Re-export commonly used types
pub use builder::{BuildError, StoreBuilder, StoreConfig};
pub use core::{Action, Contract, Event, State, StateHistory, StateTransition};
pub use store::{DispatchError, Emitter, Middleware, Reducer, Scope, Store};
