//! Floating card drawn under the pointer while a task is dragged.

use crate::board::{Board, CardSize, TaskId};
use crate::drag::{DragCoordinator, DragItem};
use kurbo::Rect;
use peniko::Color;

/// Snapshot of the dragged task, detached from the board.
#[derive(Debug, Clone)]
pub struct OverlayCard {
    pub task_id: TaskId,
    pub title: String,
    /// Color of the column the task currently sits in.
    pub color: Color,
    /// Where to draw the card; follows the pointer.
    pub rect: Rect,
    pub card_size: CardSize,
}

/// Build the overlay for the active task drag, if any.
///
/// Column drags have no overlay.
pub fn render_overlay(board: &Board, coordinator: &DragCoordinator) -> Option<OverlayCard> {
    let DragItem::Task(task_id) = coordinator.active_item()? else {
        return None;
    };
    let task = board.task(task_id)?;
    let color = board.task_color(task_id)?;
    let pointer = coordinator.pointer();
    let rect = coordinator
        .dragged_rect()
        .unwrap_or_else(|| Rect::from_points(pointer, pointer));

    Some(OverlayCard {
        task_id: task.id.clone(),
        title: task.title.clone(),
        color: color.into(),
        rect,
        card_size: board.card_size,
    })
}
