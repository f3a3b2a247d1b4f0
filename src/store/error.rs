//! Dispatch error types.

use thiserror::Error;

/// Errors reported for a dispatched action.
///
/// `Store::dispatch` is fire-and-forget and never surfaces these; they are
/// logged by the store and returned from `dispatch_and_wait` and `flush`.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DispatchError {
    /// The store was disposed before the action ran to completion.
    #[error("Store has been disposed")]
    Disposed,

    /// The enter cascade kept changing variant past the configured limit.
    #[error("Enter cascade exceeded {limit} steps (stopped in '{state}')")]
    CascadeLimitExceeded { limit: usize, state: String },

    /// The reducer panicked while handling the action.
    #[error("Reducer panicked while handling '{action}': {message}")]
    ReducerPanicked { action: String, message: String },
}
