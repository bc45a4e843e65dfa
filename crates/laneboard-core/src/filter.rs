//! Read-only board projection for search and saved views.

use crate::board::{Board, Column, Task};
use crate::views::{FilterKind, SavedView, ViewFilter};
use serde::{Deserialize, Serialize};

/// Filter value that stands for the current user.
pub const CURRENT_USER: &str = "me";

/// Who is looking at the board, and when.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterContext {
    /// Participant id matched by the `me` assignee filter.
    pub current_user: String,
    /// Today's date as `YYYY-MM-DD`, for overdue checks.
    #[serde(default)]
    pub today: Option<String>,
}

/// A column with the tasks that passed the filters, in board order.
#[derive(Debug, Clone)]
pub struct FilteredColumn<'a> {
    pub column: &'a Column,
    pub tasks: Vec<&'a Task>,
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Case-insensitive match on title, description, work package and label names.
pub fn matches_query(board: &Board, task: &Task, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }
    contains_ci(&task.title, &query)
        || task.description.as_deref().is_some_and(|d| contains_ci(d, &query))
        || task.activity.as_deref().is_some_and(|a| contains_ci(a, &query))
        || task
            .labels
            .iter()
            .filter_map(|id| board.label(id))
            .any(|label| contains_ci(&label.name, &query))
}

/// Work package code of an activity such as `"WP1: Project Setup"`.
fn work_package(activity: &str) -> String {
    activity.split(':').next().unwrap_or_default().trim().to_lowercase()
}

fn matches_filter(task: &Task, filter: &ViewFilter, ctx: &FilterContext) -> bool {
    match filter.kind {
        FilterKind::Assignee => {
            let wanted = if filter.value == CURRENT_USER {
                ctx.current_user.as_str()
            } else {
                filter.value.as_str()
            };
            task.assignees.iter().any(|p| p.id == wanted)
        }
        FilterKind::WorkPackage => task
            .activity
            .as_deref()
            .is_some_and(|a| work_package(a) == filter.value.to_lowercase()),
        FilterKind::Label => task.labels.iter().any(|l| *l == filter.value),
        FilterKind::Priority => task.priority.is_some_and(|p| p.as_str() == filter.value),
    }
}

fn is_overdue(task: &Task, ctx: &FilterContext) -> bool {
    match (&task.due_date, &ctx.today) {
        // ISO dates compare correctly as strings.
        (Some(due), Some(today)) => due.as_str() < today.as_str(),
        _ => false,
    }
}

/// Whether a task passes a view.
///
/// Filters of the same kind are alternatives; different kinds must all match.
/// Alert views only keep blocked or overdue tasks.
pub fn matches_view(task: &Task, view: &SavedView, ctx: &FilterContext) -> bool {
    let kinds = [
        FilterKind::Assignee,
        FilterKind::WorkPackage,
        FilterKind::Label,
        FilterKind::Priority,
    ];
    let filters_pass = kinds.iter().all(|kind| {
        let mut of_kind = view.filters.iter().filter(|f| f.kind == *kind).peekable();
        of_kind.peek().is_none() || of_kind.any(|f| matches_filter(task, f, ctx))
    });
    filters_pass && (!view.has_alert || task.is_blocked() || is_overdue(task, ctx))
}

/// Project the board through a search query and an optional view.
pub fn filter_board<'a>(
    board: &'a Board,
    query: &str,
    view: Option<&SavedView>,
    ctx: &FilterContext,
) -> Vec<FilteredColumn<'a>> {
    board
        .columns()
        .iter()
        .map(|column| FilteredColumn {
            column,
            tasks: column
                .tasks()
                .iter()
                .filter(|task| matches_query(board, task, query))
                .filter(|task| view.is_none_or(|v| matches_view(task, v, ctx)))
                .collect(),
        })
        .collect()
}
