//! Build errors for the store builder.

use thiserror::Error;

/// A single problem with a store's configuration.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigViolation {
    #[error("event_capacity must be greater than zero")]
    ZeroEventCapacity,

    #[error("max_cascade_depth must be greater than zero")]
    ZeroCascadeDepth,

    #[error("enter and exit actions are the same variant '{action}'")]
    AmbiguousLifecycleActions { action: String },
}

/// Errors that can occur when building a store.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Initial state not specified. Call .initial(state) before .build()")]
    MissingInitialState,

    #[error("Reducer not specified. Call .reducer(reducer) before .build()")]
    MissingReducer,

    #[error("No tokio runtime available. Call .scope(scope) or build inside a runtime")]
    NoRuntime,

    #[error("Invalid store configuration: {}", describe(.0))]
    InvalidConfig(Vec<ConfigViolation>),
}

fn describe(violations: &[ConfigViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
