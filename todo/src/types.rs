//! Domain types for the todo list.
//!
//! The application state is a single value: an ordered list of todo items
//! plus the active display filter. Actions use the same JSON vocabulary as
//! the UI layer (`{"type": "ADD_ITEM", "text": "..."}`).

use serde::{Deserialize, Serialize};

/// Unique identifier for a todo item
///
/// Allocated as one more than the largest id in the list, so ids are positive
/// and strictly increasing within a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(u64);

impl TodoId {
    /// Creates a `TodoId` from its numeric value
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the numeric value
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Completion status of a todo item
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Still to do
    #[default]
    Active,
    /// Done
    Completed,
}

impl Status {
    /// The other status
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Active => Self::Completed,
            Self::Completed => Self::Active,
        }
    }
}

/// Which todos the UI displays
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    /// Every item
    #[default]
    All,
    /// Items with [`Status::Active`]
    Active,
    /// Items with [`Status::Completed`]
    Completed,
}

impl Filter {
    /// Returns `true` if `item` is shown under this filter
    #[must_use]
    pub fn matches(self, item: &TodoItem) -> bool {
        match self {
            Self::All => true,
            Self::Active => item.status == Status::Active,
            Self::Completed => item.status == Status::Completed,
        }
    }
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        };
        f.write_str(name)
    }
}

/// A single todo item
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TodoItem {
    /// Unique identifier
    pub id: TodoId,
    /// Text shown in the list
    pub text: String,
    /// Whether the item is done
    pub status: Status,
    /// Whether the UI is currently editing this item
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub editing: bool,
}

impl TodoItem {
    /// Creates a new active item that is not being edited
    #[must_use]
    pub fn new(id: TodoId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            status: Status::Active,
            editing: false,
        }
    }

    /// Returns `true` if the item is completed
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == Status::Completed
    }
}

/// The whole application state
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppState {
    /// Todo items in display order
    pub todos: Vec<TodoItem>,
    /// Active display filter
    #[serde(default)]
    pub filter: Filter,
}

impl AppState {
    /// Creates an empty state with the `all` filter
    #[must_use]
    pub const fn new() -> Self {
        Self {
            todos: Vec::new(),
            filter: Filter::All,
        }
    }

    /// The list the application starts with
    #[must_use]
    pub fn seed() -> Self {
        Self {
            todos: vec![
                TodoItem::new(TodoId::new(1), "React"),
                TodoItem::new(TodoId::new(2), "Redux"),
                TodoItem::new(TodoId::new(3), "Immutable"),
            ],
            filter: Filter::All,
        }
    }

    /// Index of the first item with the given id
    #[must_use]
    pub fn find_item_index(&self, id: TodoId) -> Option<usize> {
        self.todos.iter().position(|item| item.id == id)
    }

    /// Returns a todo by id
    #[must_use]
    pub fn get(&self, id: TodoId) -> Option<&TodoItem> {
        self.todos.iter().find(|item| item.id == id)
    }

    /// Id for the next added item: largest id plus one, `1` on an empty list
    ///
    /// Returns `None` once the id space is exhausted.
    #[must_use]
    pub fn next_id(&self) -> Option<TodoId> {
        let max = self.todos.iter().map(|item| item.id.get()).max().unwrap_or(0);
        max.checked_add(1).map(TodoId::new)
    }

    /// Items shown under the current filter, in list order
    pub fn visible_todos(&self) -> impl Iterator<Item = &TodoItem> {
        let filter = self.filter;
        self.todos.iter().filter(move |item| filter.matches(item))
    }

    /// Number of items still to do
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.todos.iter().filter(|item| !item.is_completed()).count()
    }

    /// Number of completed items
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.todos.iter().filter(|item| item.is_completed()).count()
    }
}

/// Fields carried by `SET_STATE`; absent fields keep their current value
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialState {
    /// Replacement todo list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub todos: Option<Vec<TodoItem>>,
    /// Replacement filter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Filter>,
}

impl From<AppState> for PartialState {
    fn from(state: AppState) -> Self {
        Self {
            todos: Some(state.todos),
            filter: Some(state.filter),
        }
    }
}

/// Every state transition the UI can request
///
/// Serialised with a `type` tag in `SCREAMING_SNAKE_CASE` and camelCase
/// payload fields. Any unrecognised `type` decodes to [`TodoAction::Unknown`],
/// which the reducer ignores.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TodoAction {
    /// Merge the provided fields into the state
    SetState {
        /// Fields to replace
        state: PartialState,
    },

    /// Flip an item between active and completed
    #[serde(rename_all = "camelCase")]
    ToggleComplete {
        /// Item to toggle
        item_id: TodoId,
    },

    /// Change the display filter
    ChangeFilter {
        /// New filter
        filter: Filter,
    },

    /// Put an item into edit mode
    #[serde(rename_all = "camelCase")]
    EditItem {
        /// Item to edit
        item_id: TodoId,
    },

    /// Leave edit mode without changing the text
    #[serde(rename_all = "camelCase")]
    CancelEditing {
        /// Item being edited
        item_id: TodoId,
    },

    /// Leave edit mode and commit new text
    #[serde(rename_all = "camelCase")]
    DoneEditing {
        /// Item being edited
        item_id: TodoId,
        /// Committed text
        new_text: String,
    },

    /// Remove every completed item
    ClearCompleted,

    /// Append a new active item
    AddItem {
        /// Text of the new item
        text: String,
    },

    /// Remove an item
    #[serde(rename_all = "camelCase")]
    DeleteItem {
        /// Item to remove
        item_id: TodoId,
    },

    /// Any action kind this application does not know
    #[serde(other)]
    Unknown,
}

/// Action creators used by the UI layer
impl TodoAction {
    /// `SET_STATE` replacing both fields
    #[must_use]
    pub fn set_state(state: impl Into<PartialState>) -> Self {
        Self::SetState {
            state: state.into(),
        }
    }

    /// `TOGGLE_COMPLETE`
    #[must_use]
    pub const fn toggle_complete(item_id: TodoId) -> Self {
        Self::ToggleComplete { item_id }
    }

    /// `CHANGE_FILTER`
    #[must_use]
    pub const fn change_filter(filter: Filter) -> Self {
        Self::ChangeFilter { filter }
    }

    /// `EDIT_ITEM`
    #[must_use]
    pub const fn edit_item(item_id: TodoId) -> Self {
        Self::EditItem { item_id }
    }

    /// `CANCEL_EDITING`
    #[must_use]
    pub const fn cancel_editing(item_id: TodoId) -> Self {
        Self::CancelEditing { item_id }
    }

    /// `DONE_EDITING`
    #[must_use]
    pub fn done_editing(item_id: TodoId, new_text: impl Into<String>) -> Self {
        Self::DoneEditing {
            item_id,
            new_text: new_text.into(),
        }
    }

    /// `CLEAR_COMPLETED`
    #[must_use]
    pub const fn clear_completed() -> Self {
        Self::ClearCompleted
    }

    /// `ADD_ITEM`
    #[must_use]
    pub fn add_item(text: impl Into<String>) -> Self {
        Self::AddItem { text: text.into() }
    }

    /// `DELETE_ITEM`
    #[must_use]
    pub const fn delete_item(item_id: TodoId) -> Self {
        Self::DeleteItem { item_id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(value: serde_json::Value) -> TodoAction {
        serde_json::from_value(value).unwrap_or_else(|e| unreachable!("action should decode: {e}"))
    }

    #[test]
    fn decodes_action_vocabulary() {
        assert_eq!(
            decode(json!({"type": "TOGGLE_COMPLETE", "itemId": 2})),
            TodoAction::toggle_complete(TodoId::new(2))
        );
        assert_eq!(
            decode(json!({"type": "DONE_EDITING", "itemId": 1, "newText": "Rust"})),
            TodoAction::done_editing(TodoId::new(1), "Rust")
        );
        assert_eq!(
            decode(json!({"type": "CHANGE_FILTER", "filter": "completed"})),
            TodoAction::change_filter(Filter::Completed)
        );
        assert_eq!(decode(json!({"type": "CLEAR_COMPLETED"})), TodoAction::ClearCompleted);
        assert_eq!(
            decode(json!({"type": "ADD_ITEM", "text": "Test"})),
            TodoAction::add_item("Test")
        );
        assert_eq!(
            decode(json!({"type": "DELETE_ITEM", "itemId": 3})),
            TodoAction::delete_item(TodoId::new(3))
        );
        assert_eq!(
            decode(json!({"type": "EDIT_ITEM", "itemId": 3})),
            TodoAction::edit_item(TodoId::new(3))
        );
        assert_eq!(
            decode(json!({"type": "CANCEL_EDITING", "itemId": 3})),
            TodoAction::cancel_editing(TodoId::new(3))
        );
    }

    #[test]
    fn unknown_kinds_decode_to_unknown() {
        assert_eq!(decode(json!({"type": "UNKNOWN"})), TodoAction::Unknown);
        assert_eq!(decode(json!({"type": "UNDO", "steps": 3})), TodoAction::Unknown);
    }

    #[test]
    fn set_state_payload_is_partial() {
        let action = decode(json!({"type": "SET_STATE", "state": {"filter": "active"}}));
        assert_eq!(
            action,
            TodoAction::SetState {
                state: PartialState {
                    todos: None,
                    filter: Some(Filter::Active),
                },
            }
        );
    }

    #[test]
    fn seed_items_decode_with_editing_flag() {
        let action = decode(json!({
            "type": "SET_STATE",
            "state": {
                "todos": [
                    {"id": 1, "text": "React", "status": "active", "editing": false},
                    {"id": 2, "text": "Redux", "status": "active", "editing": false},
                    {"id": 3, "text": "Immutable", "status": "active", "editing": false},
                ],
                "filter": "all"
            }
        }));
        assert_eq!(action, TodoAction::set_state(AppState::seed()));
    }

    #[test]
    fn new_items_serialise_without_editing_field() {
        let item = TodoItem::new(TodoId::new(2), "Test");
        let value = serde_json::to_value(&item).unwrap_or_default();
        assert_eq!(value, json!({"id": 2, "text": "Test", "status": "active"}));
    }

    #[test]
    fn action_serialises_with_type_tag() {
        let value = serde_json::to_value(TodoAction::toggle_complete(TodoId::new(1)))
            .unwrap_or_default();
        assert_eq!(value, json!({"type": "TOGGLE_COMPLETE", "itemId": 1}));
    }

    #[test]
    fn malformed_payload_is_rejected() {
        let result = serde_json::from_value::<TodoAction>(json!({"type": "TOGGLE_COMPLETE"}));
        assert!(result.is_err());
    }

    #[test]
    fn next_id_is_max_plus_one() {
        assert_eq!(AppState::new().next_id(), Some(TodoId::new(1)));

        let mut state = AppState::seed();
        state.todos.swap(0, 2);
        assert_eq!(state.next_id(), Some(TodoId::new(4)));

        state.todos.push(TodoItem::new(TodoId::new(u64::MAX), "last"));
        assert_eq!(state.next_id(), None);
    }

    #[test]
    fn filter_matches_by_status() {
        let active = TodoItem::new(TodoId::new(1), "a");
        let mut done = TodoItem::new(TodoId::new(2), "b");
        done.status = Status::Completed;

        assert!(Filter::All.matches(&active) && Filter::All.matches(&done));
        assert!(Filter::Active.matches(&active) && !Filter::Active.matches(&done));
        assert!(!Filter::Completed.matches(&active) && Filter::Completed.matches(&done));
    }

    #[test]
    fn visible_todos_follow_filter() {
        let mut state = AppState::seed();
        state.todos[1].status = Status::Completed;

        state.filter = Filter::Completed;
        let visible: Vec<_> = state.visible_todos().map(|item| item.id.get()).collect();
        assert_eq!(visible, vec![2]);

        state.filter = Filter::Active;
        let visible: Vec<_> = state.visible_todos().map(|item| item.id.get()).collect();
        assert_eq!(visible, vec![1, 3]);

        assert_eq!(state.active_count(), 2);
        assert_eq!(state.completed_count(), 1);
    }
}
