//! Board session: drag lifecycle, board edits and persistence in one place.
//!
//! The session owns the committed board. A drag works on a copy taken at
//! `Start`; `End` commits the copy and `Cancel` throws it away, so the
//! committed board never holds a half-finished drag.

use crate::board::{
    Board, BoardError, CardSize, Column, ColumnId, ColumnUpdate, LabelId, Participant, Task, TaskId,
    TaskUpdate,
};
use crate::collision::{DropTarget, DropZones};
use crate::color::SerializableColor;
use crate::drag::{DragConfig, DragCoordinator, DragEvent, DragHandle, DragItem};
use crate::filter::{FilterContext, FilteredColumn, filter_board};
use crate::input::{KeyEvent, PointerEvent};
use crate::mutation::{self, MoveOutcome};
use crate::overlay::{OverlayCard, render_overlay};
use crate::storage::{BoardPersistence, KeyValueStore, Slice, StorageResult};
use crate::views::SavedView;

/// State of the drag in progress.
#[derive(Debug, Clone)]
struct ActiveDrag {
    working: Board,
    /// Target whose cross-column move was already applied during `Over`.
    applied: Option<DropTarget>,
}

/// An open board with its drag machinery and storage.
pub struct BoardSession<S: KeyValueStore> {
    board: Board,
    drag: Option<ActiveDrag>,
    coordinator: DragCoordinator,
    zones: DropZones,
    persistence: BoardPersistence<S>,
    defaulted: Vec<Slice>,
}

impl<S: KeyValueStore> BoardSession<S> {
    /// Load a project's board and open a session on it.
    pub fn open(persistence: BoardPersistence<S>, project: &str, config: DragConfig) -> Self {
        let loaded = persistence.load(project);
        let mut session = Self::new(loaded.board, persistence, config);
        session.defaulted = loaded.defaulted;
        session
    }

    /// Open a session on an already built board.
    pub fn new(board: Board, persistence: BoardPersistence<S>, config: DragConfig) -> Self {
        Self {
            board,
            drag: None,
            coordinator: DragCoordinator::new(config),
            zones: DropZones::new(),
            persistence,
            defaulted: Vec::new(),
        }
    }

    /// The board to display: the working copy while dragging.
    pub fn board(&self) -> &Board {
        self.drag.as_ref().map_or(&self.board, |d| &d.working)
    }

    /// The last committed board.
    pub fn committed_board(&self) -> &Board {
        &self.board
    }

    /// Slices that fell back to defaults when the board was loaded.
    pub fn defaulted_slices(&self) -> &[Slice] {
        &self.defaulted
    }

    pub fn persistence(&self) -> &BoardPersistence<S> {
        &self.persistence
    }

    pub fn coordinator(&self) -> &DragCoordinator {
        &self.coordinator
    }

    pub fn is_dragging(&self) -> bool {
        self.coordinator.is_dragging()
    }

    pub fn zones(&self) -> &DropZones {
        &self.zones
    }

    /// Drop zones, for the rendering surface to register into.
    pub fn zones_mut(&mut self) -> &mut DropZones {
        &mut self.zones
    }

    /// Drag handle for a task card.
    pub fn task_handle(&self, task_id: &str) -> Option<DragHandle> {
        self.board().task(task_id).map(|t| DragHandle::task(t.id.clone()))
    }

    /// Drag handle for a column header. Fixed columns have none.
    pub fn column_handle(&self, column_id: &str) -> Option<DragHandle> {
        self.board()
            .column(column_id)
            .filter(|c| !c.is_fixed())
            .map(|c| DragHandle::column(c.id.clone()))
    }

    /// The floating card of the active task drag.
    pub fn overlay(&self) -> Option<OverlayCard> {
        render_overlay(self.board(), &self.coordinator)
    }

    /// The displayed board through a search query and a saved view.
    pub fn filtered<'a>(&'a self, query: &str, view_id: Option<&str>, ctx: &FilterContext) -> Vec<FilteredColumn<'a>> {
        let board = self.board();
        let view = view_id.and_then(|id| board.view(id));
        filter_board(board, query, view, ctx)
    }

    /// Feed a pointer event through the drag coordinator and apply the result.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) -> Option<DragEvent> {
        let drag_event = self.coordinator.handle_pointer_event(event, &self.zones)?;
        self.apply_drag_event(&drag_event);
        Some(drag_event)
    }

    /// Feed a key event through the drag coordinator and apply the result.
    pub fn handle_key_event(&mut self, event: &KeyEvent) -> Option<DragEvent> {
        let drag_event = self.coordinator.handle_key_event(event)?;
        self.apply_drag_event(&drag_event);
        Some(drag_event)
    }

    /// Abort the active drag, restoring the committed board.
    pub fn cancel_drag(&mut self) -> Option<DragEvent> {
        let drag_event = self.coordinator.cancel()?;
        self.apply_drag_event(&drag_event);
        Some(drag_event)
    }

    fn apply_drag_event(&mut self, event: &DragEvent) {
        match event {
            DragEvent::Activate { item } => log::debug!("Activated {:?}", item),
            DragEvent::Start { .. } => {
                self.drag = Some(ActiveDrag {
                    working: self.board.clone(),
                    applied: None,
                });
            }
            DragEvent::Over { item, target } => self.drag_over(item, target),
            DragEvent::End { item, target } => self.drag_end(item, target),
            DragEvent::Cancel { item } => {
                if self.drag.take().is_some() {
                    log::debug!("Discarded drag of {:?}", item);
                }
            }
        }
    }

    fn drag_over(&mut self, item: &DragItem, target: &DropTarget) {
        let (DragItem::Task(task_id), Some(drag)) = (item, self.drag.as_mut()) else {
            return;
        };
        match mutation::provisional_move(&mut drag.working, task_id, target) {
            Ok(MoveOutcome::Unchanged) => {}
            Ok(_) => drag.applied = Some(target.clone()),
            Err(e) => log::debug!("Ignoring drag over {:?}: {}", target, e),
        }
    }

    fn drag_end(&mut self, item: &DragItem, target: &DropTarget) {
        let Some(mut drag) = self.drag.take() else {
            return;
        };
        let result = match (item, target) {
            // The move onto this target already happened while hovering.
            (DragItem::Task(_), _) if drag.applied.as_ref() == Some(target) => Ok(MoveOutcome::Moved),
            (DragItem::Task(task_id), _) => mutation::apply_drop(&mut drag.working, task_id, target),
            (DragItem::Column(column_id), DropTarget::Column(target_id)) => {
                mutation::move_column(&mut drag.working, column_id, target_id)
            }
            (DragItem::Column(_), DropTarget::Task(id)) => Err(mutation::MoveError::InvalidDropTarget(id.clone())),
        };
        if let Err(e) = result {
            log::debug!("Rejected drop of {:?} on {:?}: {}", item, target, e);
        }

        if drag.working != self.board {
            self.board = drag.working;
            log::info!("Committed drop of {:?} on {:?}", item, target);
            self.persistence.persist(&self.board, Slice::Columns);
        }
    }

    /// Run a direct edit on the committed board and persist the touched slices.
    fn edit<T>(
        &mut self,
        slices: &[Slice],
        f: impl FnOnce(&mut Board) -> Result<T, BoardError>,
    ) -> Result<T, BoardError> {
        if self.drag.is_some() || self.coordinator.is_dragging() {
            return Err(BoardError::DragInProgress);
        }
        let value = f(&mut self.board)?;
        for slice in slices {
            self.persistence.persist(&self.board, *slice);
        }
        Ok(value)
    }

    pub fn add_column(&mut self, name: impl Into<String>, color: SerializableColor) -> Result<ColumnId, BoardError> {
        self.edit(&[Slice::Columns], |b| Ok(b.add_column(name, color)))
    }

    pub fn delete_column(&mut self, id: &str) -> Result<Column, BoardError> {
        self.edit(&[Slice::Columns], |b| b.delete_column(id))
    }

    pub fn update_column(&mut self, id: &str, update: ColumnUpdate) -> Result<(), BoardError> {
        self.edit(&[Slice::Columns], |b| b.update_column(id, update))
    }

    /// Move an ordinary column to the position of another.
    pub fn reorder_column(&mut self, id: &str, target_id: &str) -> Result<MoveOutcome, BoardError> {
        self.edit(&[Slice::Columns], |b| Ok(mutation::move_column(b, id, target_id)?))
    }

    pub fn add_task(&mut self, task: Task) -> Result<TaskId, BoardError> {
        self.edit(&[Slice::Columns], |b| b.add_task(task))
    }

    pub fn add_task_to(&mut self, column_id: &str, task: Task) -> Result<TaskId, BoardError> {
        self.edit(&[Slice::Columns], |b| b.add_task_to(column_id, task))
    }

    pub fn delete_task(&mut self, task_id: &str) -> Result<Task, BoardError> {
        self.edit(&[Slice::Columns], |b| b.delete_task(task_id))
    }

    pub fn update_task(&mut self, task_id: &str, update: TaskUpdate) -> Result<(), BoardError> {
        self.edit(&[Slice::Columns], |b| b.update_task(task_id, update))
    }

    pub fn assign_task(&mut self, task_id: &str, participant: Participant) -> Result<bool, BoardError> {
        self.edit(&[Slice::Columns], |b| b.assign_task(task_id, participant))
    }

    pub fn unassign_task(&mut self, task_id: &str, participant_id: &str) -> Result<bool, BoardError> {
        self.edit(&[Slice::Columns], |b| b.unassign_task(task_id, participant_id))
    }

    pub fn toggle_task_label(&mut self, task_id: &str, label_id: &str) -> Result<bool, BoardError> {
        self.edit(&[Slice::Columns], |b| b.toggle_task_label(task_id, label_id))
    }

    /// Move a task without dragging, as a drop on `target` would.
    pub fn move_task(&mut self, task_id: &str, target: &DropTarget) -> Result<MoveOutcome, BoardError> {
        self.edit(&[Slice::Columns], |b| Ok(mutation::apply_drop(b, task_id, target)?))
    }

    /// Move a task to the front of the completion column.
    pub fn mark_done(&mut self, task_id: &str) -> Result<MoveOutcome, BoardError> {
        self.edit(&[Slice::Columns], |b| Ok(mutation::mark_done(b, task_id)?))
    }

    pub fn add_label(&mut self, name: impl Into<String>, color: SerializableColor) -> Result<LabelId, BoardError> {
        self.edit(&[Slice::Labels], |b| Ok(b.add_label(name, color)))
    }

    pub fn update_label(
        &mut self,
        id: &str,
        name: Option<String>,
        color: Option<SerializableColor>,
    ) -> Result<(), BoardError> {
        self.edit(&[Slice::Labels], |b| b.update_label(id, name, color))
    }

    /// Delete a label; tasks lose it too.
    pub fn delete_label(&mut self, id: &str) -> Result<(), BoardError> {
        self.edit(&[Slice::Labels, Slice::Columns], |b| b.delete_label(id).map(|_| ()))
    }

    pub fn add_view(&mut self, view: SavedView) -> Result<(), BoardError> {
        self.edit(&[Slice::Views], |b| b.add_view(view))
    }

    pub fn delete_view(&mut self, id: &str) -> Result<SavedView, BoardError> {
        self.edit(&[Slice::Views], |b| b.delete_view(id))
    }

    pub fn set_card_size(&mut self, card_size: CardSize) -> Result<(), BoardError> {
        self.edit(&[Slice::CardSize], |b| {
            b.card_size = card_size;
            Ok(())
        })
    }

    /// Write every slice of the committed board.
    pub fn save(&self) -> StorageResult<()> {
        self.persistence.save_all(&self.board)
    }
}
