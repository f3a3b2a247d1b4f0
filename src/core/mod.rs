//! Core contract types.
//!
//! This module contains the pure data side of a store:
//! - Contract traits for states, actions and events
//! - The `contract!` macro for closed enums
//! - Immutable transition history
//!
//! Nothing in here performs I/O or touches the runtime.

mod contract;
mod history;
mod macros;

pub use contract::{Action, Contract, Event, State};
pub use history::{StateHistory, StateTransition};
