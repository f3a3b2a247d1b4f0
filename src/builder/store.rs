//! Builder for constructing stores.

use crate::builder::config::StoreConfig;
use crate::builder::error::{BuildError, ConfigViolation};
use crate::core::Contract;
use crate::store::{Middleware, MiddlewareList, Reducer, Scope, Store, StoreParts};
use std::sync::Arc;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Builder for constructing stores with a fluent API.
///
/// `build()` starts the store: its driver task is spawned and the enter
/// action, if any, is queued against the initial state.
pub struct StoreBuilder<R: Reducer> {
    initial: Option<R::State>,
    reducer: Option<R>,
    enter_action: Option<R::Action>,
    exit_action: Option<R::Action>,
    middleware: MiddlewareList<R>,
    scope: Option<Scope>,
    config: StoreConfig,
}

impl<R: Reducer> StoreBuilder<R> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            initial: None,
            reducer: None,
            enter_action: None,
            exit_action: None,
            middleware: Vec::new(),
            scope: None,
            config: StoreConfig::default(),
        }
    }

    /// Set the initial state (required).
    pub fn initial(mut self, state: R::State) -> Self {
        self.initial = Some(state);
        self
    }

    /// Set the reducer (required).
    pub fn reducer(mut self, reducer: R) -> Self {
        self.reducer = Some(reducer);
        self
    }

    /// Action reduced against every newly entered variant.
    pub fn enter_action(mut self, action: R::Action) -> Self {
        self.enter_action = Some(action);
        self
    }

    /// Action reduced against a variant as it is left.
    pub fn exit_action(mut self, action: R::Action) -> Self {
        self.exit_action = Some(action);
        self
    }

    /// Append a middleware. Middleware run in the order added.
    pub fn middleware<M>(mut self, middleware: M) -> Self
    where
        M: Middleware<R::State, R::Action, R::Event> + 'static,
    {
        self.middleware.push(Arc::new(middleware));
        self
    }

    /// Append a shared middleware, e.g. one the caller inspects later.
    pub fn shared_middleware<M>(mut self, middleware: Arc<M>) -> Self
    where
        M: Middleware<R::State, R::Action, R::Event> + 'static,
    {
        self.middleware.push(middleware);
        self
    }

    /// Run in `scope` instead of the ambient runtime.
    pub fn scope(mut self, scope: Scope) -> Self {
        self.scope = Some(scope);
        self
    }

    pub fn config(mut self, config: StoreConfig) -> Self {
        self.config = config;
        self
    }

    /// Build and start the store.
    /// Returns an error if required fields are missing or the configuration
    /// is invalid.
    pub fn build(self) -> Result<Store<R>, BuildError> {
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;
        let reducer = self.reducer.ok_or(BuildError::MissingReducer)?;

        let checks: Vec<Validation<(), NonEmptyVec<ConfigViolation>>> = vec![
            self.config.validate(),
            lifecycle_actions_are_distinct(self.enter_action.as_ref(), self.exit_action.as_ref()),
        ];
        if let Validation::Failure(violations) = Validation::all_vec(checks) {
            return Err(BuildError::InvalidConfig(
                violations.iter().cloned().collect(),
            ));
        }

        let scope = match self.scope {
            Some(scope) => scope,
            None => Scope::current().ok_or(BuildError::NoRuntime)?,
        };

        tracing::debug!(
            initial = initial.name(),
            enter = ?self.enter_action.as_ref().map(|a| a.name()),
            exit = ?self.exit_action.as_ref().map(|a| a.name()),
            "building store"
        );

        Ok(Store::start(StoreParts {
            initial,
            reducer,
            enter_action: self.enter_action,
            exit_action: self.exit_action,
            middleware: self.middleware,
            scope,
            event_capacity: self.config.event_capacity,
            max_cascade_depth: self.config.max_cascade_depth,
        }))
    }
}

impl<R: Reducer> Default for StoreBuilder<R> {
    fn default() -> Self {
        Self::new()
    }
}

fn lifecycle_actions_are_distinct<A: Contract>(
    enter: Option<&A>,
    exit: Option<&A>,
) -> Validation<(), NonEmptyVec<ConfigViolation>> {
    match (enter, exit) {
        (Some(enter), Some(exit)) if enter.same_variant(exit) => {
            Validation::fail(ConfigViolation::AmbiguousLifecycleActions {
                action: enter.name().to_string(),
            })
        }
        _ => Validation::success(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Emitter;
    use async_trait::async_trait;

    #[derive(Clone, PartialEq, Debug)]
    enum TestState {
        Initial,
        Ready,
    }

    #[derive(Clone, Debug)]
    enum TestAction {
        Enter,
        Exit,
    }

    #[derive(Clone, Debug)]
    enum TestEvent {
        Noted,
    }

    crate::contract!(state TestState { Initial, Ready });
    crate::contract!(action TestAction { Enter, Exit });
    crate::contract!(event TestEvent { Noted });

    struct TestReducer;

    #[async_trait]
    impl Reducer for TestReducer {
        type State = TestState;
        type Action = TestAction;
        type Event = TestEvent;

        async fn on_dispatched(
            &self,
            state: &TestState,
            action: &TestAction,
            _emit: &Emitter<'_, TestState, TestAction, TestEvent>,
        ) -> Option<TestState> {
            match (state, action) {
                (TestState::Initial, TestAction::Enter) => Some(TestState::Ready),
                _ => None,
            }
        }
    }

    #[tokio::test]
    async fn builder_validates_required_fields() {
        let result = StoreBuilder::<TestReducer>::new().build();
        assert!(matches!(result, Err(BuildError::MissingInitialState)));

        let result = StoreBuilder::<TestReducer>::new()
            .initial(TestState::Initial)
            .build();
        assert!(matches!(result, Err(BuildError::MissingReducer)));
    }

    #[test]
    fn builder_requires_a_runtime() {
        let result = StoreBuilder::new()
            .initial(TestState::Initial)
            .reducer(TestReducer)
            .build();

        assert!(matches!(result, Err(BuildError::NoRuntime)));
    }

    #[tokio::test]
    async fn builder_accumulates_config_violations() {
        let result = StoreBuilder::new()
            .initial(TestState::Initial)
            .reducer(TestReducer)
            .enter_action(TestAction::Enter)
            .exit_action(TestAction::Enter)
            .config(StoreConfig {
                event_capacity: 0,
                max_cascade_depth: 0,
            })
            .build();

        match result {
            Err(BuildError::InvalidConfig(violations)) => {
                assert_eq!(violations.len(), 3);
                assert!(violations.contains(&ConfigViolation::AmbiguousLifecycleActions {
                    action: "Enter".to_string()
                }));
            }
            other => panic!("Expected InvalidConfig, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn fluent_api_builds_store() {
        let store = StoreBuilder::new()
            .initial(TestState::Initial)
            .reducer(TestReducer)
            .enter_action(TestAction::Enter)
            .exit_action(TestAction::Exit)
            .build()
            .unwrap();

        store.flush().await.unwrap();
        assert_eq!(store.current_state(), TestState::Ready);
    }

    #[tokio::test]
    async fn explicit_scope_is_used() {
        let scope = Scope::current().unwrap();
        let store = StoreBuilder::new()
            .initial(TestState::Initial)
            .reducer(TestReducer)
            .scope(scope.clone())
            .build()
            .unwrap();

        scope.cancel();

        assert!(store.is_disposed());
    }
}
