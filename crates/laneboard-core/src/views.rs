//! Saved view configurations.
//!
//! A fixed set of system views always exists. Only user-created views are
//! persisted; on load they are merged back behind the system views.

use crate::board::CardSize;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// What a view filter matches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterKind {
    Assignee,
    WorkPackage,
    Label,
    Priority,
}

/// A single filter of a saved view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewFilter {
    pub kind: FilterKind,
    pub value: String,
    pub label: String,
}

impl ViewFilter {
    pub fn new(kind: FilterKind, value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
            label: label.into(),
        }
    }
}

/// How a view groups tasks inside columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GroupBy {
    #[default]
    None,
    WorkPackage,
    Assignee,
    Priority,
}

/// A named filter/grouping preset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedView {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub filters: Vec<ViewFilter>,
    #[serde(default)]
    pub group_by: GroupBy,
    #[serde(default)]
    pub card_size: CardSize,
    #[serde(default)]
    pub is_system: bool,
    #[serde(default)]
    pub has_alert: bool,
}

impl SavedView {
    /// Create a user view.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            filters: Vec::new(),
            group_by: GroupBy::None,
            card_size: CardSize::Medium,
            is_system: false,
            has_alert: false,
        }
    }

    pub fn with_filter(mut self, filter: ViewFilter) -> Self {
        self.filters.push(filter);
        self
    }

    fn system(id: &str, name: &str, filters: Vec<ViewFilter>) -> Self {
        Self {
            filters,
            is_system: true,
            ..Self::new(id, name)
        }
    }
}

/// The built-in, non-deletable views.
pub fn system_views() -> Vec<SavedView> {
    vec![
        SavedView::system("all", "All Tasks", vec![]),
        SavedView::system(
            "my-tasks",
            "My Tasks",
            vec![ViewFilter::new(FilterKind::Assignee, "me", "Me")],
        ),
        SavedView::system(
            "wp1",
            "WP1: Project Setup",
            vec![ViewFilter::new(FilterKind::WorkPackage, "wp1", "WP1")],
        ),
        SavedView::system(
            "wp2",
            "WP2: Development",
            vec![ViewFilter::new(FilterKind::WorkPackage, "wp2", "WP2")],
        ),
        SavedView {
            has_alert: true,
            ..SavedView::system("blocked-overdue", "Blocked & Overdue", vec![])
        },
    ]
}

/// The views worth persisting: everything that is not a system view.
pub fn custom_views(views: &[SavedView]) -> Vec<SavedView> {
    views.iter().filter(|v| !v.is_system).cloned().collect()
}

/// Merge stored views with the fixed system views, keyed by id.
///
/// System views come first and appear exactly once. Stored entries that
/// claim to be system views or reuse a system id are dropped, and duplicate
/// custom ids keep their first occurrence.
pub fn merge_views(stored: Vec<SavedView>) -> Vec<SavedView> {
    let mut merged = system_views();
    let mut seen: HashSet<String> = merged.iter().map(|v| v.id.clone()).collect();

    for view in stored {
        if view.is_system {
            continue;
        }
        if seen.insert(view.id.clone()) {
            merged.push(view);
        } else {
            log::debug!("Dropping stored view with duplicate id {}", view.id);
        }
    }
    merged
}
