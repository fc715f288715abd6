//! Read-only projection of [`AppState`] for the rendering layer.

use crate::types::{AppState, Filter, TodoItem};
use std::fmt::Write as _;

/// What the UI needs to draw one frame
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TodoView<'a> {
    /// Items shown under the current filter, in list order
    pub visible: Vec<&'a TodoItem>,
    /// Current filter
    pub filter: Filter,
    /// Items still to do, regardless of filter
    pub active_count: usize,
    /// Completed items, regardless of filter
    pub completed_count: usize,
}

impl<'a> TodoView<'a> {
    /// Project the state into a view
    #[must_use]
    pub fn from_state(state: &'a AppState) -> Self {
        Self {
            visible: state.visible_todos().collect(),
            filter: state.filter,
            active_count: state.active_count(),
            completed_count: state.completed_count(),
        }
    }

    /// Whether the "clear completed" control should be offered
    #[must_use]
    pub const fn has_completed(&self) -> bool {
        self.completed_count > 0
    }
}

/// Render a view as plain text, one item per line
///
/// ```text
/// todos (filter: all)
///   [ ] 1. React
///   [x] 2. Redux
///   [ ] 3. Immutable (editing)
/// 2 items left | clear completed
/// ```
#[must_use]
pub fn render(view: &TodoView<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "todos (filter: {})", view.filter);

    if view.visible.is_empty() {
        out.push_str("  (nothing to show)\n");
    }

    for item in &view.visible {
        let mark = if item.is_completed() { 'x' } else { ' ' };
        let _ = write!(out, "  [{mark}] {}. {}", item.id, item.text);
        if item.editing {
            out.push_str(" (editing)");
        }
        out.push('\n');
    }

    let noun = if view.active_count == 1 { "item" } else { "items" };
    let _ = write!(out, "{} {noun} left", view.active_count);
    if view.has_completed() {
        out.push_str(" | clear completed");
    }
    out
}
