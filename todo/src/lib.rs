//! Todo list built on a unidirectional store.
//!
//! The whole application state is one [`AppState`] value. The UI turns
//! gestures into [`TodoAction`]s, the [`TodoReducer`] computes the next state,
//! and the store publishes it to subscribers for rendering.
//!
//! - Simple domain model (add, toggle, edit, delete, clear completed, filter)
//! - Explicit no-op for unknown action kinds and unknown item ids
//! - JSON action vocabulary shared with the UI layer
//! - Testing with `ReducerTest`
//!
//! # Quick Start
//!
//! ```no_run
//! use redux_todo::{create_store, AppState, TodoAction, TodoId};
//! use redux_todo_runtime::StoreConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = create_store(StoreConfig::default());
//! store.dispatch(TodoAction::set_state(AppState::seed())).await?;
//!
//! store.dispatch(TodoAction::add_item("Write docs")).await?;
//! store.dispatch(TodoAction::toggle_complete(TodoId::new(1))).await?;
//!
//! let state = store.snapshot().await;
//! println!("{} left", state.active_count());
//! # Ok(())
//! # }
//! ```

pub mod reducer;
pub mod types;
pub mod view;

// Re-export commonly used types
pub use reducer::TodoReducer;
pub use types::{AppState, Filter, PartialState, Status, TodoAction, TodoId, TodoItem};
pub use view::{render, TodoView};

use redux_todo_runtime::{Store, StoreConfig};

/// Store specialised to the todo list
pub type TodoStore = Store<AppState, TodoAction, (), TodoReducer>;

/// Create an empty todo store
///
/// The application fills it with a `SET_STATE` action at startup.
#[must_use]
pub fn create_store(config: StoreConfig) -> TodoStore {
    Store::with_config(AppState::new(), TodoReducer::new(), (), config)
}
