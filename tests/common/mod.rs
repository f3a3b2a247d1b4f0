//! Shared fixtures: the main screen contract and a recording middleware.

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tarte::contract;
use tarte::core::Contract;
use tarte::store::{Emitter, Middleware, Reducer};

#[derive(Clone, PartialEq, Debug)]
pub enum MainState {
    Initial,
    Loading,
    Stable {
        data_list: Vec<String>,
        click_counter: u32,
    },
}

#[derive(Clone, PartialEq, Debug)]
pub enum MainAction {
    Enter,
    Exit,
    Click { id: u64 },
}

#[derive(Clone, PartialEq, Debug)]
pub enum MainEvent {
    ShowToast(String),
}

contract!(state MainState { Initial, Loading, Stable });
contract!(action MainAction { Enter, Exit, Click });
contract!(event MainEvent { ShowToast });

pub const LOADED_TOAST: &str = "Data loaded";
pub const CLICKED_TOAST: &str = "Clicked";
pub const LEFT_LOADING_TOAST: &str = "Loading finished";

/// Reducer for the main screen. Loading simulates a slow fetch.
pub struct MainReducer {
    pub fetch_delay: Duration,
    pub log: Log,
}

impl MainReducer {
    pub fn new(log: Log) -> Self {
        Self {
            fetch_delay: Duration::from_millis(5),
            log,
        }
    }
}

#[async_trait]
impl Reducer for MainReducer {
    type State = MainState;
    type Action = MainAction;
    type Event = MainEvent;

    async fn on_dispatched(
        &self,
        state: &MainState,
        action: &MainAction,
        emit: &Emitter<'_, MainState, MainAction, MainEvent>,
    ) -> Option<MainState> {
        self.log
            .push(format!("reduce:{}:{}", state.name(), action.name()));
        match (state, action) {
            (MainState::Initial, MainAction::Enter) => Some(MainState::Loading),
            (MainState::Loading, MainAction::Enter) => {
                tokio::time::sleep(self.fetch_delay).await;
                Some(MainState::Stable {
                    data_list: vec![],
                    click_counter: 0,
                })
            }
            (MainState::Loading, MainAction::Exit) => {
                emit.emit(MainEvent::ShowToast(LEFT_LOADING_TOAST.to_string()));
                // Ignored by the store: an exit call cannot redirect the transition.
                Some(MainState::Initial)
            }
            (MainState::Stable { .. }, MainAction::Enter) => {
                emit.emit(MainEvent::ShowToast(LOADED_TOAST.to_string()));
                None
            }
            (
                MainState::Stable {
                    data_list,
                    click_counter,
                },
                MainAction::Click { .. },
            ) => {
                emit.emit(MainEvent::ShowToast(CLICKED_TOAST.to_string()));
                Some(MainState::Stable {
                    data_list: data_list.clone(),
                    click_counter: click_counter + 1,
                })
            }
            _ => None,
        }
    }
}

/// Ordered, shareable log of what reducers and middleware observed.
#[derive(Clone, Default)]
pub struct Log(Arc<Mutex<Vec<String>>>);

impl Log {
    pub fn push(&self, entry: String) {
        self.0.lock().unwrap().push(entry);
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.entries()
            .iter()
            .filter(|e| e.starts_with(prefix))
            .count()
    }

    pub fn position(&self, entry: &str) -> Option<usize> {
        self.entries().iter().position(|e| e == entry)
    }

    pub fn clear(&self) {
        self.0.lock().unwrap().clear();
    }
}

/// Writes every middleware hook into a [`Log`].
pub struct Recorder {
    pub log: Log,
}

impl<S, A, E> Middleware<S, A, E> for Recorder
where
    S: tarte::State,
    A: tarte::Action,
    E: tarte::Event,
{
    fn on_dispatched(&self, state: &S, action: &A) {
        self.log
            .push(format!("dispatched:{}:{}", state.name(), action.name()));
    }

    fn on_event_emitted(&self, state: &S, action: &A, event: &E) {
        self.log.push(format!(
            "event:{}:{}:{:?}",
            state.name(),
            action.name(),
            event
        ));
    }

    fn on_state_exited(&self, state: &S) {
        self.log.push(format!("exited:{}", state.name()));
    }

    fn on_state_changed(&self, _prev: &S, _action: &A, next: &S) {
        self.log.push(format!("changed:{:?}", next));
    }

    fn on_state_entered(&self, state: &S) {
        self.log.push(format!("entered:{}", state.name()));
    }
}
