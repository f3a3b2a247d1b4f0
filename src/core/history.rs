//! Transition history tracking.
//!
//! Provides immutable tracking of published state changes over time.

use super::contract::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single published state change.
///
/// # Example
///
/// ```rust
/// use tarte::contract;
/// use tarte::core::StateTransition;
/// use chrono::Utc;
///
/// #[derive(Clone, PartialEq, Debug)]
/// enum TaskState {
///     Pending,
///     Running,
/// }
///
/// contract!(state TaskState { Pending, Running });
///
/// let transition = StateTransition {
///     from: TaskState::Pending,
///     to: TaskState::Running,
///     action: "Start".to_string(),
///     timestamp: Utc::now(),
/// };
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateTransition<S> {
    /// The snapshot that was current before the change
    pub from: S,
    /// The snapshot that was published
    pub to: S,
    /// Name of the action that produced the change
    pub action: String,
    /// When the change was published
    pub timestamp: DateTime<Utc>,
}

impl<S: State> StateTransition<S> {
    /// Whether the change moved to a different variant.
    pub fn is_variant_change(&self) -> bool {
        !self.from.same_variant(&self.to)
    }
}

/// Ordered history of state changes.
///
/// History is immutable - `record` returns a new history with the
/// transition added.
///
/// # Example
///
/// ```rust
/// use tarte::contract;
/// use tarte::core::{StateHistory, StateTransition};
/// use chrono::Utc;
///
/// #[derive(Clone, PartialEq, Debug)]
/// enum WorkState {
///     Start,
///     Middle,
///     End,
/// }
///
/// contract!(state WorkState { Start, Middle, End });
///
/// let history = StateHistory::new()
///     .record(StateTransition {
///         from: WorkState::Start,
///         to: WorkState::Middle,
///         action: "Enter".to_string(),
///         timestamp: Utc::now(),
///     })
///     .record(StateTransition {
///         from: WorkState::Middle,
///         to: WorkState::End,
///         action: "Enter".to_string(),
///         timestamp: Utc::now(),
///     });
///
/// let path = history.get_path();
/// assert_eq!(path.len(), 3); // Start -> Middle -> End
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StateHistory<S> {
    transitions: Vec<StateTransition<S>>,
}

impl<S: State> Default for StateHistory<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> FromIterator<StateTransition<S>> for StateHistory<S> {
    fn from_iter<I: IntoIterator<Item = StateTransition<S>>>(iter: I) -> Self {
        Self {
            transitions: iter.into_iter().collect(),
        }
    }
}

impl<S: State> StateHistory<S> {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Record a transition, returning a new history.
    ///
    /// The existing history is left untouched.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tarte::contract;
    /// use tarte::core::{StateHistory, StateTransition};
    /// use chrono::Utc;
    ///
    /// #[derive(Clone, PartialEq, Debug)]
    /// enum Step { A, B }
    ///
    /// contract!(state Step { A, B });
    ///
    /// let history = StateHistory::new();
    /// let new_history = history.record(StateTransition {
    ///     from: Step::A,
    ///     to: Step::B,
    ///     action: "Next".to_string(),
    ///     timestamp: Utc::now(),
    /// });
    ///
    /// assert_eq!(new_history.len(), 1);
    /// assert!(history.is_empty()); // Original unchanged
    /// ```
    pub fn record(&self, transition: StateTransition<S>) -> Self {
        let mut transitions = self.transitions.clone();
        transitions.push(transition);
        Self { transitions }
    }

    /// Get the path of snapshots traversed.
    ///
    /// Returns the `from` of the first transition, then the `to` of each
    /// transition, in order.
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::new();
        if let Some(first) = self.transitions.first() {
            path.push(&first.from);
        }
        for transition in &self.transitions {
            path.push(&transition.to);
        }
        path
    }

    /// Names of the variants visited, collapsing consecutive snapshots of
    /// the same variant.
    pub fn variant_path(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        let mut last: Option<&S> = None;
        for state in self.get_path() {
            if last.map_or(true, |prev| !prev.same_variant(state)) {
                names.push(state.name());
            }
            last = Some(state);
        }
        names
    }

    /// Elapsed time between the first and last transition.
    ///
    /// Returns `None` if there are no transitions.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.first(), self.transitions.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    /// All transitions, oldest first.
    pub fn transitions(&self) -> &[StateTransition<S>] {
        &self.transitions
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    enum TestState {
        Initial,
        Loading,
        Stable { clicks: u32 },
    }

    crate::contract!(state TestState { Initial, Loading, Stable });

    fn transition(from: TestState, to: TestState) -> StateTransition<TestState> {
        StateTransition {
            from,
            to,
            action: "Enter".to_string(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn new_history_is_empty() {
        let history: StateHistory<TestState> = StateHistory::new();
        assert!(history.is_empty());
        assert!(history.get_path().is_empty());
        assert!(history.variant_path().is_empty());
        assert!(history.duration().is_none());
    }

    #[test]
    fn record_is_immutable() {
        let history = StateHistory::new();
        let new_history = history.record(transition(TestState::Initial, TestState::Loading));

        assert_eq!(history.len(), 0);
        assert_eq!(new_history.len(), 1);
    }

    #[test]
    fn get_path_returns_snapshot_sequence() {
        let history = StateHistory::new()
            .record(transition(TestState::Initial, TestState::Loading))
            .record(transition(
                TestState::Loading,
                TestState::Stable { clicks: 0 },
            ));

        let path = history.get_path();
        assert_eq!(path.len(), 3);
        assert_eq!(path[0], &TestState::Initial);
        assert_eq!(path[1], &TestState::Loading);
        assert_eq!(path[2], &TestState::Stable { clicks: 0 });
    }

    #[test]
    fn variant_path_collapses_field_updates() {
        let history = StateHistory::new()
            .record(transition(
                TestState::Loading,
                TestState::Stable { clicks: 0 },
            ))
            .record(transition(
                TestState::Stable { clicks: 0 },
                TestState::Stable { clicks: 1 },
            ));

        assert_eq!(history.variant_path(), vec!["Loading", "Stable"]);
        assert!(history.transitions()[0].is_variant_change());
        assert!(!history.transitions()[1].is_variant_change());
    }

    #[test]
    fn collects_from_transitions() {
        let history: StateHistory<TestState> = vec![
            transition(TestState::Initial, TestState::Loading),
            transition(TestState::Loading, TestState::Stable { clicks: 0 }),
        ]
        .into_iter()
        .collect();

        assert_eq!(history.len(), 2);
        assert_eq!(history.variant_path(), vec!["Initial", "Loading", "Stable"]);
    }

    #[test]
    fn duration_calculates_elapsed_time() {
        let history = StateHistory::new().record(transition(TestState::Initial, TestState::Loading));

        std::thread::sleep(std::time::Duration::from_millis(10));

        let history = history.record(transition(
            TestState::Loading,
            TestState::Stable { clicks: 0 },
        ));

        let duration = history.duration();
        assert!(duration.is_some());
        assert!(duration.unwrap() >= std::time::Duration::from_millis(10));
    }

    #[test]
    fn single_transition_has_duration_zero() {
        let history = StateHistory::new().record(transition(TestState::Initial, TestState::Loading));
        assert_eq!(history.duration(), Some(std::time::Duration::from_secs(0)));
    }

    #[test]
    fn history_serializes_correctly() {
        let history = StateHistory::new().record(transition(
            TestState::Loading,
            TestState::Stable { clicks: 4 },
        ));

        let json = serde_json::to_string(&history).unwrap();
        let deserialized: StateHistory<TestState> = serde_json::from_str(&json).unwrap();

        assert_eq!(history.transitions(), deserialized.transitions());
    }
}
