//! Laneboard Core Library
//!
//! Platform-agnostic board model, drag-and-drop engine and persistence for
//! the Laneboard kanban board.

pub mod board;
pub mod collision;
pub mod color;
pub mod drag;
pub mod filter;
pub mod input;
pub mod mutation;
pub mod overlay;
pub mod seed;
pub mod session;
pub mod storage;
pub mod views;

pub use board::{
    Board, BoardError, CardSize, ChecklistProgress, Column, ColumnId, ColumnUpdate, Label, LabelId, LayoutError,
    Participant, Priority, Task, TaskId, TaskUpdate, WipStatus, validate_columns,
};
pub use collision::{DropTarget, DropZone, DropZones, Resolution, closest_corners, corner_distance};
pub use color::{ColorParseError, SerializableColor};
pub use drag::{DEFAULT_ACTIVATION_DISTANCE, DragConfig, DragCoordinator, DragEvent, DragHandle, DragItem};
pub use filter::{FilterContext, FilteredColumn, filter_board};
pub use input::{CANCEL_KEY, KeyEvent, MouseButton, PointerEvent, PointerSensor};
pub use mutation::{MoveError, MoveOutcome, MoveResult};
pub use overlay::{OverlayCard, render_overlay};
pub use seed::SeedConfig;
pub use session::BoardSession;
pub use storage::{
    BoardPersistence, KeyValueStore, LoadedBoard, MemoryStorage, PlatformStorage, Slice, SliceError, StorageError,
    StorageResult, create_default_storage, storage_key,
};
pub use views::{FilterKind, GroupBy, SavedView, ViewFilter};

#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStorage;

#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;
