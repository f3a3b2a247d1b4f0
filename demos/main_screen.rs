//! Main Screen Store
//!
//! This example drives a screen through Initial -> Loading -> Stable using
//! enter actions, then handles clicks that emit toasts.
//!
//! Key concepts:
//! - Enter/exit cascade on variant change
//! - Replay-latest state channel, no-replay event channel
//! - Middleware for logging and history
//!
//! Run with: RUST_LOG=tarte=debug cargo run --example main_screen

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tarte::contract;
use tarte::store::{Emitter, HistoryMiddleware, Reducer, Store, TracingMiddleware};
use tracing_subscriber::EnvFilter;

#[derive(Clone, PartialEq, Debug)]
enum MainState {
    Initial,
    Loading,
    Stable {
        data_list: Vec<String>,
        click_counter: u32,
    },
}

#[derive(Clone, Debug)]
enum MainAction {
    Enter,
    Exit,
    Click { id: u64 },
}

#[derive(Clone, Debug)]
enum MainEvent {
    ShowToast(String),
}

contract!(state MainState { Initial, Loading, Stable });
contract!(action MainAction { Enter, Exit, Click });
contract!(event MainEvent { ShowToast });

struct MainReducer;

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
        match (state, action) {
            (MainState::Initial, MainAction::Enter) => Some(MainState::Loading),
            (MainState::Loading, MainAction::Enter) => {
                // Pretend to fetch the list.
                tokio::time::sleep(Duration::from_millis(200)).await;
                Some(MainState::Stable {
                    data_list: vec!["alpha".into(), "beta".into()],
                    click_counter: 0,
                })
            }
            (MainState::Stable { .. }, MainAction::Enter) => {
                emit.emit(MainEvent::ShowToast("Data loaded".into()));
                None
            }
            (
                MainState::Stable {
                    data_list,
                    click_counter,
                },
                MainAction::Click { id },
            ) => {
                emit.emit(MainEvent::ShowToast(format!("Clicked item {id}")));
                Some(MainState::Stable {
                    data_list: data_list.clone(),
                    click_counter: click_counter + 1,
                })
            }
            (_, MainAction::Exit) => {
                println!("  leaving {:?}", state);
                None
            }
            _ => None,
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("=== Main Screen Store ===\n");

    let history = Arc::new(HistoryMiddleware::<MainState>::new());
    let store = Store::builder(MainReducer, MainState::Initial)
        .enter_action(MainAction::Enter)
        .exit_action(MainAction::Exit)
        .middleware(TracingMiddleware::<MainState, MainAction, MainEvent>::new())
        .shared_middleware(history.clone())
        .build()
        .unwrap();

    let collector = store.collect(
        |state| println!("  state: {:?}", state),
        |event| println!("  event: {:?}", event),
    );

    store.flush().await.unwrap();
    println!("\nLoaded. Clicking twice...\n");

    store.dispatch(MainAction::Click { id: 1 });
    let state = store
        .dispatch_and_wait(MainAction::Click { id: 2 })
        .await
        .unwrap();
    println!("\nSettled on {:?}", state);

    // Let the collector drain before shutting down.
    tokio::time::sleep(Duration::from_millis(50)).await;
    store.dispose();
    let _ = collector.await;

    println!("\nVariants visited: {:?}", history.snapshot().variant_path());
    println!("Transitions recorded: {}", history.snapshot().len());

    println!("\n=== Example Complete ===");
}
