//! Text front end for the todo store.
//!
//! Seeds the store, prints the list after every state change, and reads one
//! JSON action per line from stdin:
//!
//! ```text
//! {"type": "ADD_ITEM", "text": "Test"}
//! {"type": "TOGGLE_COMPLETE", "itemId": 1}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.

use redux_todo::{create_store, render, AppState, TodoAction, TodoView};
use redux_todo_runtime::StoreConfig;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout only carries the rendered list
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "redux_todo=info,redux_todo_runtime=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let store = create_store(StoreConfig::default());

    let _subscription = store.subscribe(|state| {
        println!("{}\n", render(&TodoView::from_state(state)));
    });

    store.dispatch(TodoAction::set_state(AppState::seed())).await?;
    tracing::info!("Store seeded, reading actions from stdin");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut dispatched = 0_usize;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match serde_json::from_str::<TodoAction>(line) {
            Ok(action) => {
                tracing::debug!(?action, "Dispatching");
                store.dispatch(action).await?;
                dispatched += 1;
            },
            Err(error) => tracing::warn!(%error, line, "Skipping malformed action"),
        }
    }

    store.shutdown_default().await?;

    let state = store.snapshot().await;
    tracing::info!(
        dispatched,
        todos = state.todos.len(),
        active = state.active_count(),
        "Session finished"
    );

    Ok(())
}
