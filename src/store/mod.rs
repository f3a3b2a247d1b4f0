//! The reactive store and its collaborators.
//!
//! This module is the imperative shell around the pure contract types:
//! it owns the current snapshot, serializes transitions and broadcasts
//! results.
//!
//! # Key Concepts
//!
//! - **Store**: queues actions and runs them one at a time under a lock
//! - **Reducer**: user-supplied `(state, action, emit) -> Option<state>`
//! - **Emitter**: publishes one-shot events from inside the reducer
//! - **Middleware**: passive observers of dispatch and emission
//! - **Scope**: runtime handle plus cancellation token the store runs in
//!
//! # Transition
//!
//! For each queued action, while holding the lock:
//!
//! 1. reduce the current snapshot; `None` keeps it and stops
//! 2. on a variant change, reduce the exit action against the old snapshot
//!    (only its events matter)
//! 3. publish the result
//! 4. on a variant change, reduce the enter action against the new snapshot
//!    and repeat from 2 until the variant settles

mod emitter;
mod engine;
mod error;
mod middleware;
mod reducer;
mod scope;
mod subscription;

pub(crate) use engine::{MiddlewareList, StoreParts};

pub use emitter::Emitter;
pub use engine::{Store, StoreId};
pub use error::DispatchError;
pub use middleware::{HistoryMiddleware, Middleware, TracingMiddleware};
pub use reducer::Reducer;
pub use scope::Scope;
pub use subscription::{EventSubscription, StateSubscription};
