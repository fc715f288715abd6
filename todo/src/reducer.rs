//! Reducer logic for the todo list.
//!
//! Every action maps the current state to the next one without side effects.
//! Actions that name an item id not present in the list leave the state
//! unchanged.

use crate::types::{AppState, Filter, PartialState, TodoAction, TodoId, TodoItem};
use redux_todo_core::{effect::Effect, reducer::Reducer, SmallVec};

/// Reducer for the todo list
#[derive(Clone, Copy, Debug, Default)]
pub struct TodoReducer;

impl TodoReducer {
    /// Creates a new `TodoReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn set_state(state: &mut AppState, new_state: PartialState) {
        if let Some(todos) = new_state.todos {
            state.todos = todos;
        }
        if let Some(filter) = new_state.filter {
            state.filter = filter;
        }
    }

    /// Applies `update` to the item with `id`, leaving its position unchanged
    fn update_item(state: &mut AppState, id: TodoId, update: impl FnOnce(&mut TodoItem)) {
        match state.find_item_index(id) {
            Some(index) => update(&mut state.todos[index]),
            None => tracing::debug!(item_id = %id, "No todo with this id, ignoring action"),
        }
    }

    fn change_filter(state: &mut AppState, filter: Filter) {
        state.filter = filter;
    }

    fn clear_completed(state: &mut AppState) {
        state.todos.retain(|item| !item.is_completed());
    }

    fn add_item(state: &mut AppState, text: String) {
        let Some(id) = state.next_id() else {
            tracing::warn!("Todo id space exhausted, ignoring ADD_ITEM");
            return;
        };
        state.todos.push(TodoItem::new(id, text));
    }

    fn delete_item(state: &mut AppState, id: TodoId) {
        state.todos.retain(|item| item.id != id);
    }
}

impl Reducer for TodoReducer {
    type State = AppState;
    type Action = TodoAction;
    type Environment = ();

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            TodoAction::SetState { state: new_state } => Self::set_state(state, new_state),
            TodoAction::ToggleComplete { item_id } => Self::update_item(state, item_id, |item| {
                item.status = item.status.toggled();
            }),
            TodoAction::ChangeFilter { filter } => Self::change_filter(state, filter),
            TodoAction::EditItem { item_id } => {
                Self::update_item(state, item_id, |item| item.editing = true);
            },
            TodoAction::CancelEditing { item_id } => {
                Self::update_item(state, item_id, |item| item.editing = false);
            },
            TodoAction::DoneEditing { item_id, new_text } => {
                Self::update_item(state, item_id, |item| {
                    item.editing = false;
                    item.text = new_text;
                });
            },
            TodoAction::ClearCompleted => Self::clear_completed(state),
            TodoAction::AddItem { text } => Self::add_item(state, text),
            TodoAction::DeleteItem { item_id } => Self::delete_item(state, item_id),
            TodoAction::Unknown => tracing::trace!("Ignoring unknown action"),
        }

        SmallVec::new()
    }
}
