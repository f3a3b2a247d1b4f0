//! Store configuration and its validation.

use crate::builder::error::ConfigViolation;
use serde::{Deserialize, Serialize};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Tunables for a store.
///
/// Deserializes with defaults for missing fields, so hosts can embed it in
/// their own configuration files.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Events buffered per subscriber before the slowest one starts lagging.
    pub event_capacity: usize,

    /// Enter steps a single dispatch may chain before the cascade is cut.
    pub max_cascade_depth: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            event_capacity: 64,
            max_cascade_depth: 32,
        }
    }
}

impl StoreConfig {
    /// Check every setting, accumulating ALL violations.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<ConfigViolation>> {
        let checks: Vec<Validation<(), NonEmptyVec<ConfigViolation>>> = vec![
            if self.event_capacity == 0 {
                Validation::fail(ConfigViolation::ZeroEventCapacity)
            } else {
                Validation::success(())
            },
            if self.max_cascade_depth == 0 {
                Validation::fail(ConfigViolation::ZeroCascadeDepth)
            } else {
                Validation::success(())
            },
        ];

        Validation::all_vec(checks).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(StoreConfig::default().validate().is_success());
    }

    #[test]
    fn validation_accumulates_all_violations() {
        let config = StoreConfig {
            event_capacity: 0,
            max_cascade_depth: 0,
        };

        match config.validate() {
            Validation::Failure(errors) => {
                assert_eq!(errors.len(), 2);
                assert!(errors
                    .iter()
                    .any(|e| matches!(e, ConfigViolation::ZeroEventCapacity)));
                assert!(errors
                    .iter()
                    .any(|e| matches!(e, ConfigViolation::ZeroCascadeDepth)));
            }
            Validation::Success(_) => panic!("Expected failures, got success"),
        }
    }

    #[test]
    fn single_violation_is_reported() {
        let config = StoreConfig {
            max_cascade_depth: 0,
            ..StoreConfig::default()
        };

        let result = config.validate();
        assert!(result.is_failure());
        if let Validation::Failure(errors) = result {
            assert_eq!(errors.len(), 1);
        }
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config: StoreConfig = serde_json::from_str(r#"{"max_cascade_depth": 4}"#).unwrap();

        assert_eq!(config.max_cascade_depth, 4);
        assert_eq!(config.event_capacity, 64);
    }
}
