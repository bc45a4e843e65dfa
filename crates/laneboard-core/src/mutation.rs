//! Structural board mutations driven by drag and drop.
//!
//! Every operation either applies fully or leaves the board untouched, and
//! every task stays present exactly once.

use crate::board::{Board, ColumnId};
use crate::collision::DropTarget;
use thiserror::Error;

/// Errors from drop mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("Unknown task: {0}")]
    UnknownTask(String),
    #[error("Invalid drop target: {0}")]
    InvalidDropTarget(String),
    #[error("Column {0} has a fixed position")]
    ImmutablePosition(ColumnId),
}

/// Result type for drop mutations.
pub type MoveResult<T> = Result<T, MoveError>;

/// What a mutation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The task changed columns.
    Moved,
    /// The task or column changed position within its sequence.
    Reordered,
    /// Nothing changed.
    Unchanged,
}

/// Move the element at `from` to `to`, shifting everything in between.
pub fn array_move<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from == to || from >= items.len() || to >= items.len() {
        return false;
    }
    let item = items.remove(from);
    items.insert(to, item);
    true
}

/// The column a drop target belongs to.
fn target_column(board: &Board, target: &DropTarget) -> MoveResult<usize> {
    match target {
        DropTarget::Column(id) => board.column_index(id),
        DropTarget::Task(id) => board.locate_task(id).map(|(ci, _)| ci),
    }
    .ok_or_else(|| MoveError::InvalidDropTarget(target.id().to_string()))
}

/// Move a task into another column, before `before` or at the end.
///
/// An unknown `before` id appends. A task already in the destination column
/// is left where it is, so repeating the call is harmless.
pub fn move_task_across(
    board: &mut Board,
    task_id: &str,
    column_id: &str,
    before: Option<&str>,
) -> MoveResult<MoveOutcome> {
    let (from_ci, from_ti) = board
        .locate_task(task_id)
        .ok_or_else(|| MoveError::UnknownTask(task_id.to_string()))?;
    let to_ci = board
        .column_index(column_id)
        .ok_or_else(|| MoveError::InvalidDropTarget(column_id.to_string()))?;
    if from_ci == to_ci {
        return Ok(MoveOutcome::Unchanged);
    }

    let task = board.columns[from_ci].tasks.remove(from_ti);
    let destination = &mut board.columns[to_ci].tasks;
    let index = before
        .and_then(|id| destination.iter().position(|t| t.id == id))
        .unwrap_or(destination.len());
    destination.insert(index, task);
    log::debug!("Moved task {} into column {} at {}", task_id, column_id, index);
    Ok(MoveOutcome::Moved)
}

/// Reorder a task inside its own column.
///
/// A task target takes that task's index; a column target moves the task to
/// the end.
pub fn reorder_within(board: &mut Board, task_id: &str, target: &DropTarget) -> MoveResult<MoveOutcome> {
    let (ci, from) = board
        .locate_task(task_id)
        .ok_or_else(|| MoveError::UnknownTask(task_id.to_string()))?;
    if target_column(board, target)? != ci {
        return Err(MoveError::InvalidDropTarget(target.id().to_string()));
    }

    let tasks = &mut board.columns[ci].tasks;
    let to = match target {
        DropTarget::Column(_) => tasks.len() - 1,
        DropTarget::Task(id) => tasks
            .iter()
            .position(|t| &t.id == id)
            .ok_or_else(|| MoveError::InvalidDropTarget(id.clone()))?,
    };
    if array_move(tasks, from, to) {
        Ok(MoveOutcome::Reordered)
    } else {
        Ok(MoveOutcome::Unchanged)
    }
}

/// Apply a final task drop, choosing between a cross-column move and a
/// same-column reorder.
pub fn apply_drop(board: &mut Board, task_id: &str, target: &DropTarget) -> MoveResult<MoveOutcome> {
    let (from_ci, _) = board
        .locate_task(task_id)
        .ok_or_else(|| MoveError::UnknownTask(task_id.to_string()))?;
    let to_ci = target_column(board, target)?;

    if from_ci == to_ci {
        return reorder_within(board, task_id, target);
    }
    let column_id = board.columns[to_ci].id.clone();
    let before = match target {
        DropTarget::Task(id) => Some(id.as_str()),
        DropTarget::Column(_) => None,
    };
    move_task_across(board, task_id, &column_id, before)
}

/// Apply the provisional part of a drag-over: a task hovering over another
/// column moves into it, before the hovered task. Hovering inside its own
/// column changes nothing.
pub fn provisional_move(board: &mut Board, task_id: &str, target: &DropTarget) -> MoveResult<MoveOutcome> {
    let (from_ci, _) = board
        .locate_task(task_id)
        .ok_or_else(|| MoveError::UnknownTask(task_id.to_string()))?;
    let to_ci = target_column(board, target)?;
    if from_ci == to_ci {
        return Ok(MoveOutcome::Unchanged);
    }
    apply_drop(board, task_id, target)
}

/// Reorder an ordinary column to the position of another ordinary column.
pub fn move_column(board: &mut Board, column_id: &str, target_id: &str) -> MoveResult<MoveOutcome> {
    let from = board
        .column_index(column_id)
        .ok_or_else(|| MoveError::InvalidDropTarget(column_id.to_string()))?;
    let to = board
        .column_index(target_id)
        .ok_or_else(|| MoveError::InvalidDropTarget(target_id.to_string()))?;
    for index in [from, to] {
        let column = &board.columns[index];
        if column.is_fixed() {
            return Err(MoveError::ImmutablePosition(column.id.clone()));
        }
    }

    if array_move(&mut board.columns, from, to) {
        log::debug!("Moved column {} to index {}", column_id, to);
        Ok(MoveOutcome::Reordered)
    } else {
        Ok(MoveOutcome::Unchanged)
    }
}

/// Move a task to the front of the completion column.
pub fn mark_done(board: &mut Board, task_id: &str) -> MoveResult<MoveOutcome> {
    let completion = board
        .completion_column()
        .map(|c| c.id.clone())
        .ok_or_else(|| MoveError::InvalidDropTarget("completion".to_string()))?;
    let first = board
        .column(&completion)
        .and_then(|c| c.tasks().first())
        .map(|t| t.id.clone());

    match first {
        Some(first) => {
            let outcome = move_task_across(board, task_id, &completion, Some(first.as_str()))?;
            if outcome == MoveOutcome::Unchanged {
                return reorder_within(board, task_id, &DropTarget::Task(first));
            }
            Ok(outcome)
        }
        None => move_task_across(board, task_id, &completion, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Column, Task, validate_columns};
    use crate::color::SerializableColor;
    use crate::seed::SeedConfig;
    use crate::views;
    use std::collections::BTreeSet;

    fn ids(board: &Board, column: &str) -> Vec<String> {
        board.column(column).unwrap().task_ids()
    }

    fn all_ids(board: &Board) -> BTreeSet<String> {
        board.task_ids().into_iter().collect()
    }

    /// Open: [A, B, C]; In Review (empty); Done: [T1].
    fn small_board() -> Board {
        let columns = vec![
            Column::entry("open", "Open", SerializableColor::rgb(0x60, 0xA5, 0xFA)).with_tasks(vec![
                Task::with_id("A", "A"),
                Task::with_id("B", "B"),
                Task::with_id("C", "C"),
            ]),
            Column::new("review", "In Review", SerializableColor::rgb(0x96, 0x8F, 0xE5)),
            Column::new("testing", "Testing", SerializableColor::rgb(0x00, 0xD4, 0x00)),
            Column::completion("done", "Done", SerializableColor::rgb(0x34, 0xD3, 0x99))
                .with_tasks(vec![Task::with_id("T1", "T1")]),
        ];
        Board::from_parts("TEST", columns, Vec::new(), views::system_views(), Default::default())
    }

    #[test]
    fn test_array_move() {
        let mut items = vec!['a', 'b', 'c', 'd'];
        assert!(array_move(&mut items, 0, 2));
        assert_eq!(items, vec!['b', 'c', 'a', 'd']);
        assert!(array_move(&mut items, 3, 0));
        assert_eq!(items, vec!['d', 'b', 'c', 'a']);
        assert!(!array_move(&mut items, 1, 1));
        assert!(!array_move(&mut items, 1, 9));
    }

    #[test]
    fn test_reorder_last_to_first() {
        let mut board = small_board();
        let outcome = apply_drop(&mut board, "C", &DropTarget::Task("A".to_string())).unwrap();
        assert_eq!(outcome, MoveOutcome::Reordered);
        assert_eq!(ids(&board, "open"), vec!["C", "A", "B"]);
    }

    #[test]
    fn test_reorder_down_lands_after_target() {
        let mut board = small_board();
        apply_drop(&mut board, "A", &DropTarget::Task("B".to_string())).unwrap();
        assert_eq!(ids(&board, "open"), vec!["B", "A", "C"]);
    }

    #[test]
    fn test_reorder_onto_own_column_moves_to_end() {
        let mut board = small_board();
        apply_drop(&mut board, "A", &DropTarget::Column("open".to_string())).unwrap();
        assert_eq!(ids(&board, "open"), vec!["B", "C", "A"]);
    }

    #[test]
    fn test_drop_on_self_is_unchanged() {
        let mut board = small_board();
        let before = board.clone();
        let outcome = apply_drop(&mut board, "B", &DropTarget::Task("B".to_string())).unwrap();
        assert_eq!(outcome, MoveOutcome::Unchanged);
        assert_eq!(board, before);
    }

    #[test]
    fn test_move_into_empty_column_recolors() {
        let mut board = small_board();
        let outcome = apply_drop(&mut board, "T1", &DropTarget::Column("review".to_string())).unwrap();
        assert_eq!(outcome, MoveOutcome::Moved);
        assert_eq!(ids(&board, "review"), vec!["T1"]);
        assert!(ids(&board, "done").is_empty());
        assert_eq!(
            board.task_color("T1"),
            Some(SerializableColor::from_hex("#968FE5").unwrap())
        );
    }

    #[test]
    fn test_move_before_target_task() {
        let mut board = small_board();
        apply_drop(&mut board, "T1", &DropTarget::Task("B".to_string())).unwrap();
        assert_eq!(ids(&board, "open"), vec!["A", "T1", "B", "C"]);
    }

    #[test]
    fn test_move_across_is_idempotent() {
        let mut board = small_board();
        move_task_across(&mut board, "A", "review", None).unwrap();
        let once = board.clone();
        let outcome = move_task_across(&mut board, "A", "review", None).unwrap();
        assert_eq!(outcome, MoveOutcome::Unchanged);
        assert_eq!(board, once);
    }

    #[test]
    fn test_move_across_unknown_before_appends() {
        let mut board = small_board();
        move_task_across(&mut board, "A", "done", Some("ghost")).unwrap();
        assert_eq!(ids(&board, "done"), vec!["T1", "A"]);
    }

    #[test]
    fn test_unknown_ids_leave_board_untouched() {
        let mut board = small_board();
        let before = board.clone();
        assert_eq!(
            apply_drop(&mut board, "ghost", &DropTarget::Column("review".to_string())),
            Err(MoveError::UnknownTask("ghost".to_string()))
        );
        assert_eq!(
            apply_drop(&mut board, "A", &DropTarget::Column("nowhere".to_string())),
            Err(MoveError::InvalidDropTarget("nowhere".to_string()))
        );
        assert_eq!(
            apply_drop(&mut board, "A", &DropTarget::Task("ghost".to_string())),
            Err(MoveError::InvalidDropTarget("ghost".to_string()))
        );
        assert_eq!(board, before);
    }

    #[test]
    fn test_reorder_within_rejects_other_column() {
        let mut board = small_board();
        assert!(matches!(
            reorder_within(&mut board, "A", &DropTarget::Task("T1".to_string())),
            Err(MoveError::InvalidDropTarget(_))
        ));
    }

    #[test]
    fn test_provisional_move_only_crosses_columns() {
        let mut board = small_board();
        let outcome = provisional_move(&mut board, "C", &DropTarget::Task("A".to_string())).unwrap();
        assert_eq!(outcome, MoveOutcome::Unchanged);
        assert_eq!(ids(&board, "open"), vec!["A", "B", "C"]);

        let outcome = provisional_move(&mut board, "C", &DropTarget::Task("T1".to_string())).unwrap();
        assert_eq!(outcome, MoveOutcome::Moved);
        assert_eq!(ids(&board, "done"), vec!["C", "T1"]);
    }

    #[test]
    fn test_move_column() {
        let mut board = small_board();
        let outcome = move_column(&mut board, "testing", "review").unwrap();
        assert_eq!(outcome, MoveOutcome::Reordered);
        let order: Vec<_> = board.columns().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(order, vec!["open", "testing", "review", "done"]);
    }

    #[test]
    fn test_fixed_columns_never_move() {
        let mut board = Board::seeded("TEST", &SeedConfig { tasks_per_column: 1 });
        let order: Vec<_> = board.columns().iter().map(|c| c.id.clone()).collect();

        for from in &order {
            for to in &order {
                let _ = move_column(&mut board, from, to);
                assert!(board.columns()[0].is_entry());
                assert!(board.columns().last().unwrap().is_completion());
                assert!(validate_columns(board.columns()).is_ok());
            }
        }
        assert_eq!(
            move_column(&mut board, "open", "in-review"),
            Err(MoveError::ImmutablePosition("open".to_string()))
        );
        assert_eq!(
            move_column(&mut board, "in-review", "completed"),
            Err(MoveError::ImmutablePosition("completed".to_string()))
        );
    }

    #[test]
    fn test_every_drop_preserves_task_set() {
        let board = Board::seeded("TEST", &SeedConfig { tasks_per_column: 3 });
        let expected = all_ids(&board);
        let mut targets: Vec<DropTarget> = board
            .columns()
            .iter()
            .map(|c| DropTarget::Column(c.id.clone()))
            .collect();
        targets.extend(board.task_ids().into_iter().map(DropTarget::Task));

        for task in board.task_ids() {
            for target in &targets {
                let mut moved = board.clone();
                apply_drop(&mut moved, &task, target).unwrap();
                assert_eq!(all_ids(&moved), expected);
                assert_eq!(moved.task_count(), board.task_count());
                assert_eq!(moved.task_color(&task), moved.column_of_task(&task).map(|c| c.color));
            }
        }
    }

    #[test]
    fn test_mark_done_goes_to_front() {
        let mut board = small_board();
        assert_eq!(mark_done(&mut board, "B").unwrap(), MoveOutcome::Moved);
        assert_eq!(ids(&board, "done"), vec!["B", "T1"]);
        assert_eq!(ids(&board, "open"), vec!["A", "C"]);
    }

    #[test]
    fn test_mark_done_inside_completion() {
        let mut board = small_board();
        move_task_across(&mut board, "A", "done", None).unwrap();
        assert_eq!(ids(&board, "done"), vec!["T1", "A"]);
        assert_eq!(mark_done(&mut board, "A").unwrap(), MoveOutcome::Reordered);
        assert_eq!(ids(&board, "done"), vec!["A", "T1"]);
        assert_eq!(mark_done(&mut board, "A").unwrap(), MoveOutcome::Unchanged);
    }

    #[test]
    fn test_mark_done_into_empty_completion() {
        let mut board = small_board();
        board.delete_task("T1").unwrap();
        mark_done(&mut board, "C").unwrap();
        assert_eq!(ids(&board, "done"), vec!["C"]);
    }
}
