//! # Redux Todo Testing
//!
//! Testing utilities and helpers for reducers built on `redux-todo-core`.
//!
//! This crate provides:
//! - [`ReducerTest`]: Given-When-Then harness for reducers
//! - [`assertions`]: Effect assertion helpers
//! - [`init_test_tracing`]: Log capture for tests
//!
//! ## Example
//!
//! ```ignore
//! use redux_todo_testing::{assertions, ReducerTest};
//!
//! #[test]
//! fn add_item_appends() {
//!     ReducerTest::new(TodoReducer::new())
//!         .with_env(TodoEnvironment)
//!         .given_state(AppState::default())
//!         .when_action(TodoAction::add_item("Test"))
//!         .then_state(|state| assert_eq!(state.todos.len(), 1))
//!         .then_effects(assertions::assert_no_effects)
//!         .run();
//! }
//! ```

mod reducer_test;

pub use reducer_test::{assertions, ReducerTest};

use tracing_subscriber::EnvFilter;

/// Install a tracing subscriber that writes through the test harness
///
/// Output is captured per test and shown only for failing tests. Honours
/// `RUST_LOG`, defaulting to `debug`. Calling it more than once is harmless.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}
