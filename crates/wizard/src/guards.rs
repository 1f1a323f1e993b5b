//! Guards and context assignments for selection steps.
//!
//! Guards are total predicates: a missing field is a valid input, never a
//! fault. Assignments take the context by value and return the updated one.

use common::Identified;
use pagination::Page;

use crate::context::SelectionContext;

pub fn item_selected<T>(context: &SelectionContext<T>) -> bool {
    context.selected.is_some()
}

pub fn no_item_selected<T>(context: &SelectionContext<T>) -> bool {
    context.selected.is_none()
}

/// True if a `SelectItem` payload names an item at all.
pub fn has_explicit_id(id: &str) -> bool {
    !id.is_empty()
}

/// Finds the item with `id` in the latest successful page.
pub fn lookup<T: Identified + Clone>(response: Option<&Page<T>>, id: &str) -> Option<T> {
    response?.items.iter().find(|item| item.id() == id).cloned()
}

/// Replaces the selection with the item matching `id`.
///
/// An id missing from the current page clears the selection.
pub fn assign_selection<T: Identified + Clone>(
    mut context: SelectionContext<T>,
    id: &str,
) -> SelectionContext<T> {
    context.selected = lookup(context.response.as_ref(), id);
    context
}

pub fn clear_selection<T>(mut context: SelectionContext<T>) -> SelectionContext<T> {
    context.selected = None;
    context
}

/// Stores a successful page and forgets any earlier failure.
pub fn store_response<T>(mut context: SelectionContext<T>, page: Page<T>) -> SelectionContext<T> {
    context.response = Some(page);
    context.error = None;
    context
}

pub fn store_error<T>(
    mut context: SelectionContext<T>,
    error: impl Into<String>,
) -> SelectionContext<T> {
    context.error = Some(error.into());
    context
}
