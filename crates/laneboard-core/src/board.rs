//! Board data model: columns, tasks, labels and preferences.
//!
//! The board is a strict ownership tree: the [`Board`] owns its columns and
//! every [`Column`] owns its tasks. A task's color is not stored; it is read
//! from the column that currently contains it.

use crate::color::SerializableColor;
use crate::mutation::MoveError;
use crate::seed::{self, SeedConfig};
use crate::views::{self, SavedView};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Column identifier.
pub type ColumnId = String;
/// Task identifier.
pub type TaskId = String;
/// Label identifier.
pub type LabelId = String;

/// Errors from direct board edits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("Unknown column: {0}")]
    UnknownColumn(ColumnId),
    #[error("Unknown task: {0}")]
    UnknownTask(TaskId),
    #[error("Unknown label: {0}")]
    UnknownLabel(LabelId),
    #[error("Column {0} is fixed and cannot be removed")]
    FixedColumn(ColumnId),
    #[error("Column {0} still holds {1} task(s)")]
    ColumnNotEmpty(ColumnId, usize),
    #[error("View {0} is a system view")]
    SystemView(String),
    #[error("View id {0} is already taken")]
    DuplicateView(String),
    #[error("Unknown view: {0}")]
    UnknownView(String),
    #[error("A drag is in progress")]
    DragInProgress,
    #[error(transparent)]
    Move(#[from] MoveError),
}

/// Structural problems in a column layout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("Board needs an entry and a completion column")]
    TooFewColumns,
    #[error("First column must be the only entry column")]
    MisplacedEntry,
    #[error("Last column must be the only completion column")]
    MisplacedCompletion,
    #[error("Duplicate column id: {0}")]
    DuplicateColumn(ColumnId),
    #[error("Duplicate task id: {0}")]
    DuplicateTask(TaskId),
}

/// Card size preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl CardSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardSize::Small => "small",
            CardSize::Medium => "medium",
            CardSize::Large => "large",
        }
    }
}

impl fmt::Display for CardSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CardSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "small" => Ok(CardSize::Small),
            "medium" => Ok(CardSize::Medium),
            "large" => Ok(CardSize::Large),
            other => Err(format!("Unknown card size: {other}")),
        }
    }
}

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

/// A person assigned to a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl Participant {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            avatar: None,
        }
    }
}

/// Checklist completion counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistProgress {
    pub completed: u32,
    pub total: u32,
}

/// A unit of work. Owned by exactly one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assignees: Vec<Participant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    /// Work package the task belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<LabelId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checklist: Option<ChecklistProgress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocked_reason: Option<String>,
}

impl Task {
    /// Create a task with a fresh id.
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_id(format!("task-{}", Uuid::new_v4()), title)
    }

    /// Create a task with an explicit id.
    pub fn with_id(id: impl Into<TaskId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            assignees: Vec::new(),
            due_date: None,
            activity: None,
            labels: Vec::new(),
            priority: None,
            attachment_count: None,
            comment_count: None,
            checklist: None,
            blocked_reason: None,
        }
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked_reason.is_some()
    }

    /// Add an assignee. Returns false if already assigned.
    pub fn assign(&mut self, participant: Participant) -> bool {
        if self.assignees.iter().any(|p| p.id == participant.id) {
            return false;
        }
        self.assignees.push(participant);
        true
    }

    /// Remove an assignee by id. Returns true if removed.
    pub fn unassign(&mut self, participant_id: &str) -> bool {
        let before = self.assignees.len();
        self.assignees.retain(|p| p.id != participant_id);
        self.assignees.len() != before
    }
}

/// Field changes for [`Board::update_task`]. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub due_date: Option<Option<String>>,
    pub priority: Option<Option<Priority>>,
    pub blocked_reason: Option<Option<String>>,
}

/// WIP limit status of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WipStatus {
    /// No limit configured.
    Unlimited,
    Within,
    /// Over the limit.
    Over,
    /// More than twice the limit.
    Critical,
}

/// A named, ordered lane holding tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    pub name: String,
    pub color: SerializableColor,
    #[serde(default)]
    is_entry: bool,
    #[serde(default)]
    is_completion: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wip_limit: Option<usize>,
    #[serde(default)]
    pub(crate) tasks: Vec<Task>,
}

impl Column {
    /// Create an ordinary column.
    pub fn new(id: impl Into<ColumnId>, name: impl Into<String>, color: SerializableColor) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color,
            is_entry: false,
            is_completion: false,
            wip_limit: None,
            tasks: Vec::new(),
        }
    }

    /// Create the entry column.
    pub fn entry(id: impl Into<ColumnId>, name: impl Into<String>, color: SerializableColor) -> Self {
        Self {
            is_entry: true,
            ..Self::new(id, name, color)
        }
    }

    /// Create the completion column.
    pub fn completion(id: impl Into<ColumnId>, name: impl Into<String>, color: SerializableColor) -> Self {
        Self {
            is_completion: true,
            ..Self::new(id, name, color)
        }
    }

    pub fn with_wip_limit(mut self, limit: usize) -> Self {
        self.wip_limit = Some(limit);
        self
    }

    pub fn with_tasks(mut self, tasks: Vec<Task>) -> Self {
        self.tasks = tasks;
        self
    }

    pub fn is_entry(&self) -> bool {
        self.is_entry
    }

    pub fn is_completion(&self) -> bool {
        self.is_completion
    }

    /// Entry and completion columns never move and are never deleted.
    pub fn is_fixed(&self) -> bool {
        self.is_entry || self.is_completion
    }

    /// Tasks in display order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task_ids(&self) -> Vec<TaskId> {
        self.tasks.iter().map(|t| t.id.clone()).collect()
    }

    pub fn task_index(&self, task_id: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == task_id)
    }

    pub fn contains_task(&self, task_id: &str) -> bool {
        self.task_index(task_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn wip_status(&self) -> WipStatus {
        match self.wip_limit {
            None => WipStatus::Unlimited,
            Some(limit) if self.tasks.len() > limit.saturating_mul(2) => WipStatus::Critical,
            Some(limit) if self.tasks.len() > limit => WipStatus::Over,
            Some(_) => WipStatus::Within,
        }
    }
}

/// Field changes for [`Board::update_column`].
#[derive(Debug, Clone, Default)]
pub struct ColumnUpdate {
    pub name: Option<String>,
    pub color: Option<SerializableColor>,
    pub wip_limit: Option<Option<usize>>,
}

/// A label definition shared by the board's tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub id: LabelId,
    pub name: String,
    pub color: SerializableColor,
}

impl Label {
    pub fn new(id: impl Into<LabelId>, name: impl Into<String>, color: SerializableColor) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color,
        }
    }
}

/// Check the structural invariants of a column layout.
///
/// The entry column must be first and unique, the completion column last and
/// unique, and column and task ids unique across the board.
pub fn validate_columns(columns: &[Column]) -> Result<(), LayoutError> {
    if columns.len() < 2 {
        return Err(LayoutError::TooFewColumns);
    }
    let last = columns.len() - 1;
    for (index, column) in columns.iter().enumerate() {
        if column.is_entry != (index == 0) || (column.is_entry && column.is_completion) {
            return Err(LayoutError::MisplacedEntry);
        }
        if column.is_completion != (index == last) {
            return Err(LayoutError::MisplacedCompletion);
        }
    }

    let mut column_ids = HashSet::new();
    let mut task_ids = HashSet::new();
    for column in columns {
        if !column_ids.insert(column.id.as_str()) {
            return Err(LayoutError::DuplicateColumn(column.id.clone()));
        }
        for task in &column.tasks {
            if !task_ids.insert(task.id.as_str()) {
                return Err(LayoutError::DuplicateTask(task.id.clone()));
            }
        }
    }
    Ok(())
}

/// The full kanban state for one project.
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    /// Project name; also the persistence identity.
    pub project: String,
    pub(crate) columns: Vec<Column>,
    pub(crate) labels: Vec<Label>,
    pub(crate) views: Vec<SavedView>,
    pub card_size: CardSize,
}

impl Board {
    /// Assemble a board from already-validated slices.
    pub fn from_parts(
        project: impl Into<String>,
        columns: Vec<Column>,
        labels: Vec<Label>,
        views: Vec<SavedView>,
        card_size: CardSize,
    ) -> Self {
        Self {
            project: project.into(),
            columns,
            labels,
            views,
            card_size,
        }
    }

    /// Create a board filled with the default seed data.
    pub fn seeded(project: impl Into<String>, config: &SeedConfig) -> Self {
        Self::from_parts(
            project,
            seed::default_columns(config),
            seed::default_labels(),
            views::system_views(),
            CardSize::default(),
        )
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn views(&self) -> &[SavedView] {
        &self.views
    }

    pub fn column(&self, id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == id)
    }

    pub fn column_index(&self, id: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.id == id)
    }

    pub fn entry_column(&self) -> Option<&Column> {
        self.columns.iter().find(|c| c.is_entry)
    }

    pub fn completion_column(&self) -> Option<&Column> {
        self.columns.iter().find(|c| c.is_completion)
    }

    /// Find a task as `(column index, task index)`.
    pub fn locate_task(&self, task_id: &str) -> Option<(usize, usize)> {
        self.columns
            .iter()
            .enumerate()
            .find_map(|(ci, column)| column.task_index(task_id).map(|ti| (ci, ti)))
    }

    pub fn task(&self, task_id: &str) -> Option<&Task> {
        let (ci, ti) = self.locate_task(task_id)?;
        self.columns.get(ci)?.tasks.get(ti)
    }

    /// The column currently containing a task.
    pub fn column_of_task(&self, task_id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.contains_task(task_id))
    }

    /// A task's derived color: the color of its containing column.
    pub fn task_color(&self, task_id: &str) -> Option<SerializableColor> {
        self.column_of_task(task_id).map(|c| c.color)
    }

    /// All task ids, column by column.
    pub fn task_ids(&self) -> Vec<TaskId> {
        self.columns.iter().flat_map(|c| c.task_ids()).collect()
    }

    pub fn task_count(&self) -> usize {
        self.columns.iter().map(Column::len).sum()
    }

    pub fn label(&self, id: &str) -> Option<&Label> {
        self.labels.iter().find(|l| l.id == id)
    }

    pub fn view(&self, id: &str) -> Option<&SavedView> {
        self.views.iter().find(|v| v.id == id)
    }

    fn column_mut(&mut self, id: &str) -> Result<&mut Column, BoardError> {
        self.columns
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| BoardError::UnknownColumn(id.to_string()))
    }

    fn task_mut(&mut self, task_id: &str) -> Result<&mut Task, BoardError> {
        self.columns
            .iter_mut()
            .flat_map(|c| c.tasks.iter_mut())
            .find(|t| t.id == task_id)
            .ok_or_else(|| BoardError::UnknownTask(task_id.to_string()))
    }

    /// Add an ordinary column just before the completion column.
    pub fn add_column(&mut self, name: impl Into<String>, color: SerializableColor) -> ColumnId {
        let id = format!("col-{}", Uuid::new_v4());
        let column = Column::new(id.clone(), name, color);
        let index = self
            .columns
            .iter()
            .position(|c| c.is_completion)
            .unwrap_or(self.columns.len());
        self.columns.insert(index, column);
        id
    }

    /// Delete an ordinary, empty column.
    pub fn delete_column(&mut self, id: &str) -> Result<Column, BoardError> {
        let index = self
            .column_index(id)
            .ok_or_else(|| BoardError::UnknownColumn(id.to_string()))?;
        let column = &self.columns[index];
        if column.is_fixed() {
            return Err(BoardError::FixedColumn(id.to_string()));
        }
        if !column.is_empty() {
            return Err(BoardError::ColumnNotEmpty(id.to_string(), column.len()));
        }
        Ok(self.columns.remove(index))
    }

    /// Rename, recolor or change the WIP limit of a column.
    ///
    /// Recoloring a column recolors all of its tasks since their color is derived.
    pub fn update_column(&mut self, id: &str, update: ColumnUpdate) -> Result<(), BoardError> {
        let column = self.column_mut(id)?;
        if let Some(name) = update.name {
            column.name = name;
        }
        if let Some(color) = update.color {
            column.color = color;
        }
        if let Some(limit) = update.wip_limit {
            column.wip_limit = limit;
        }
        Ok(())
    }

    /// Add a task at the end of the entry column.
    pub fn add_task(&mut self, task: Task) -> Result<TaskId, BoardError> {
        let entry_id = self
            .entry_column()
            .map(|c| c.id.clone())
            .ok_or_else(|| BoardError::UnknownColumn("entry".to_string()))?;
        self.add_task_to(&entry_id, task)
    }

    /// Add a task at the end of a specific column.
    pub fn add_task_to(&mut self, column_id: &str, mut task: Task) -> Result<TaskId, BoardError> {
        if self.locate_task(&task.id).is_some() {
            task.id = format!("task-{}", Uuid::new_v4());
        }
        let id = task.id.clone();
        self.column_mut(column_id)?.tasks.push(task);
        Ok(id)
    }

    pub fn delete_task(&mut self, task_id: &str) -> Result<Task, BoardError> {
        let (ci, ti) = self
            .locate_task(task_id)
            .ok_or_else(|| BoardError::UnknownTask(task_id.to_string()))?;
        Ok(self.columns[ci].tasks.remove(ti))
    }

    /// Edit a task's fields. Position and identity are not editable here.
    pub fn update_task(&mut self, task_id: &str, update: TaskUpdate) -> Result<(), BoardError> {
        let task = self.task_mut(task_id)?;
        if let Some(title) = update.title {
            task.title = title;
        }
        if let Some(description) = update.description {
            task.description = description;
        }
        if let Some(due_date) = update.due_date {
            task.due_date = due_date;
        }
        if let Some(priority) = update.priority {
            task.priority = priority;
        }
        if let Some(reason) = update.blocked_reason {
            task.blocked_reason = reason;
        }
        Ok(())
    }

    pub fn assign_task(&mut self, task_id: &str, participant: Participant) -> Result<bool, BoardError> {
        Ok(self.task_mut(task_id)?.assign(participant))
    }

    pub fn unassign_task(&mut self, task_id: &str, participant_id: &str) -> Result<bool, BoardError> {
        Ok(self.task_mut(task_id)?.unassign(participant_id))
    }

    /// Toggle a label on a task. Returns whether the label is now present.
    pub fn toggle_task_label(&mut self, task_id: &str, label_id: &str) -> Result<bool, BoardError> {
        if self.label(label_id).is_none() {
            return Err(BoardError::UnknownLabel(label_id.to_string()));
        }
        let task = self.task_mut(task_id)?;
        if let Some(pos) = task.labels.iter().position(|l| l == label_id) {
            task.labels.remove(pos);
            Ok(false)
        } else {
            task.labels.push(label_id.to_string());
            Ok(true)
        }
    }

    pub fn add_label(&mut self, name: impl Into<String>, color: SerializableColor) -> LabelId {
        let id = format!("label-{}", Uuid::new_v4());
        self.labels.push(Label::new(id.clone(), name, color));
        id
    }

    pub fn update_label(
        &mut self,
        id: &str,
        name: Option<String>,
        color: Option<SerializableColor>,
    ) -> Result<(), BoardError> {
        let label = self
            .labels
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| BoardError::UnknownLabel(id.to_string()))?;
        if let Some(name) = name {
            label.name = name;
        }
        if let Some(color) = color {
            label.color = color;
        }
        Ok(())
    }

    /// Delete a label and strip it from every task.
    pub fn delete_label(&mut self, id: &str) -> Result<Label, BoardError> {
        let pos = self
            .labels
            .iter()
            .position(|l| l.id == id)
            .ok_or_else(|| BoardError::UnknownLabel(id.to_string()))?;
        for task in self.columns.iter_mut().flat_map(|c| c.tasks.iter_mut()) {
            task.labels.retain(|l| l != id);
        }
        Ok(self.labels.remove(pos))
    }

    /// Add a user-created view.
    pub fn add_view(&mut self, mut view: SavedView) -> Result<(), BoardError> {
        if self.view(&view.id).is_some() {
            return Err(BoardError::DuplicateView(view.id));
        }
        view.is_system = false;
        self.views.push(view);
        Ok(())
    }

    pub fn delete_view(&mut self, id: &str) -> Result<SavedView, BoardError> {
        let pos = self
            .views
            .iter()
            .position(|v| v.id == id)
            .ok_or_else(|| BoardError::UnknownView(id.to_string()))?;
        if self.views[pos].is_system {
            return Err(BoardError::SystemView(id.to_string()));
        }
        Ok(self.views.remove(pos))
    }
}
