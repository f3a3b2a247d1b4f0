//! Builder API for store construction.
//!
//! This module provides a fluent builder, the store configuration and the
//! errors reported when a store cannot be started.

pub mod config;
pub mod error;
pub mod store;

pub use config::StoreConfig;
pub use error::{BuildError, ConfigViolation};
pub use store::StoreBuilder;

use crate::store::{Reducer, Store};

impl<R: Reducer> Store<R> {
    /// Start building a store for `reducer` beginning in `initial`.
    ///
    /// # Example
    ///
    /// ```
    /// use async_trait::async_trait;
    /// use tarte::contract;
    /// use tarte::store::{Emitter, Reducer, Store};
    ///
    /// #[derive(Clone, PartialEq, Debug)]
    /// enum Door { Closed, Open }
    /// #[derive(Clone, Debug)]
    /// enum Push { Once }
    /// #[derive(Clone, Debug)]
    /// enum Creak { Loud }
    ///
    /// contract!(state Door { Closed, Open });
    /// contract!(action Push { Once });
    /// contract!(event Creak { Loud });
    ///
    /// struct DoorReducer;
    ///
    /// #[async_trait]
    /// impl Reducer for DoorReducer {
    ///     type State = Door;
    ///     type Action = Push;
    ///     type Event = Creak;
    ///
    ///     async fn on_dispatched(
    ///         &self,
    ///         state: &Door,
    ///         _action: &Push,
    ///         emit: &Emitter<'_, Door, Push, Creak>,
    ///     ) -> Option<Door> {
    ///         emit.emit(Creak::Loud);
    ///         match state {
    ///             Door::Closed => Some(Door::Open),
    ///             Door::Open => Some(Door::Closed),
    ///         }
    ///     }
    /// }
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() {
    /// let store = Store::builder(DoorReducer, Door::Closed).build().unwrap();
    /// let state = store.dispatch_and_wait(Push::Once).await.unwrap();
    /// assert_eq!(state, Door::Open);
    /// # }
    /// ```
    pub fn builder(reducer: R, initial: R::State) -> StoreBuilder<R> {
        StoreBuilder::new().reducer(reducer).initial(initial)
    }
}
