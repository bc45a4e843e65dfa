//! Drag coordinator: turns pointer input into a drag lifecycle.
//!
//! A drag is well-formed: exactly one [`DragEvent::Start`], zero or more
//! [`DragEvent::Over`], then either [`DragEvent::End`] or
//! [`DragEvent::Cancel`]. A press released before any move carried it past the
//! activation distance produces a single [`DragEvent::Activate`] instead.

use crate::board::{ColumnId, TaskId};
use crate::collision::{DropTarget, DropZones, Resolution, closest_corners};
use crate::input::{CANCEL_KEY, KeyEvent, MouseButton, PointerEvent, PointerSensor};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Default activation distance in logical pixels.
pub const DEFAULT_ACTIVATION_DISTANCE: f64 = 8.0;

/// Something that can be dragged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DragItem {
    Task(TaskId),
    Column(ColumnId),
}

impl DragItem {
    pub fn id(&self) -> &str {
        match self {
            Self::Task(id) | Self::Column(id) => id,
        }
    }
}

/// Handle the rendering surface attaches pointer listeners to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DragHandle {
    pub item: DragItem,
}

impl DragHandle {
    pub fn task(id: impl Into<TaskId>) -> Self {
        Self {
            item: DragItem::Task(id.into()),
        }
    }

    pub fn column(id: impl Into<ColumnId>) -> Self {
        Self {
            item: DragItem::Column(id.into()),
        }
    }
}

/// Drag lifecycle events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragEvent {
    /// Plain click on a handle: open the item.
    Activate { item: DragItem },
    Start { item: DragItem },
    /// The candidate target changed.
    Over { item: DragItem, target: DropTarget },
    End { item: DragItem, target: DropTarget },
    Cancel { item: DragItem },
}

/// Drag tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragConfig {
    /// Minimum pointer travel before a press becomes a drag.
    pub activation_distance: f64,
    /// Key name that cancels an active drag.
    pub cancel_key: String,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            activation_distance: DEFAULT_ACTIVATION_DISTANCE,
            cancel_key: CANCEL_KEY.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
enum Phase {
    Idle,
    /// Pressed on a handle, not yet past the activation distance.
    Pressed { item: DragItem, origin_rect: Option<Rect> },
    Dragging {
        item: DragItem,
        origin_rect: Option<Rect>,
        over: Option<DropTarget>,
    },
}

/// Turns a continuous pointer stream into discrete drag events.
///
/// Only one item can be dragged at a time; presses during an active drag are
/// ignored.
#[derive(Debug, Clone)]
pub struct DragCoordinator {
    config: DragConfig,
    sensor: PointerSensor,
    phase: Phase,
}

impl Default for DragCoordinator {
    fn default() -> Self {
        Self::new(DragConfig::default())
    }
}

impl DragCoordinator {
    pub fn new(config: DragConfig) -> Self {
        Self {
            sensor: PointerSensor::new(config.activation_distance),
            config,
            phase: Phase::Idle,
        }
    }

    pub fn config(&self) -> &DragConfig {
        &self.config
    }

    /// The item being dragged, once the drag has started.
    pub fn active_item(&self) -> Option<&DragItem> {
        match &self.phase {
            Phase::Dragging { item, .. } => Some(item),
            _ => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, Phase::Dragging { .. })
    }

    /// The current candidate target of the active drag.
    pub fn over(&self) -> Option<&DropTarget> {
        match &self.phase {
            Phase::Dragging { over, .. } => over.as_ref(),
            _ => None,
        }
    }

    pub fn pointer(&self) -> Point {
        self.sensor.position()
    }

    pub fn drag_delta(&self) -> Option<Vec2> {
        self.sensor.delta()
    }

    /// The dragged item's rect: its original slot moved by the pointer delta.
    pub fn dragged_rect(&self) -> Option<Rect> {
        match &self.phase {
            Phase::Dragging { origin_rect, .. } => {
                let delta = self.sensor.delta().unwrap_or(Vec2::ZERO);
                origin_rect.map(|r| r + delta)
            }
            _ => None,
        }
    }

    /// Process a pointer event against the currently registered zones.
    pub fn handle_pointer_event(&mut self, event: PointerEvent, zones: &DropZones) -> Option<DragEvent> {
        match event {
            PointerEvent::Down { position, button, handle } => {
                if button != MouseButton::Left || !matches!(self.phase, Phase::Idle) {
                    return None;
                }
                let handle = handle?;
                self.sensor.press(position);
                let origin_rect = zones.rect_of_item(&handle.item);
                self.phase = Phase::Pressed {
                    item: handle.item,
                    origin_rect,
                };
                None
            }
            PointerEvent::Move { position } => {
                let activated = self.sensor.move_to(position);
                match &self.phase {
                    Phase::Idle => None,
                    Phase::Pressed { item, origin_rect } => {
                        if !activated {
                            return None;
                        }
                        let item = item.clone();
                        let origin_rect = *origin_rect;
                        log::debug!("Drag start: {:?}", item);
                        self.phase = Phase::Dragging {
                            item: item.clone(),
                            origin_rect,
                            over: None,
                        };
                        Some(DragEvent::Start { item })
                    }
                    Phase::Dragging { .. } => self.track(zones),
                }
            }
            PointerEvent::Up { position, button } => {
                if button != MouseButton::Left {
                    return None;
                }
                self.sensor.move_to(position);
                let dragged = self.dragged_rect();
                self.sensor.release(position);
                match std::mem::replace(&mut self.phase, Phase::Idle) {
                    Phase::Idle => None,
                    // Never activated by a Move: a click, wherever it lands.
                    Phase::Pressed { item, .. } => Some(DragEvent::Activate { item }),
                    Phase::Dragging { item, over, .. } => {
                        let target = match self.resolve(zones, &item, dragged, position) {
                            Resolution::Target(target) => Some(target),
                            Resolution::Unchanged => over,
                            Resolution::NoCandidate => None,
                        };
                        match target {
                            Some(target) => {
                                log::debug!("Drag end: {:?} -> {:?}", item, target);
                                Some(DragEvent::End { item, target })
                            }
                            None => {
                                log::debug!("Drag cancelled, no drop target: {:?}", item);
                                Some(DragEvent::Cancel { item })
                            }
                        }
                    }
                }
            }
        }
    }

    /// Process a key event. The cancel key aborts an active drag.
    pub fn handle_key_event(&mut self, event: &KeyEvent) -> Option<DragEvent> {
        match event {
            KeyEvent::Pressed(key) if *key == self.config.cancel_key => self.cancel(),
            _ => None,
        }
    }

    /// Abort the current press or drag.
    pub fn cancel(&mut self) -> Option<DragEvent> {
        let position = self.sensor.position();
        self.sensor.release(position);
        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Dragging { item, .. } => {
                log::debug!("Drag cancelled: {:?}", item);
                Some(DragEvent::Cancel { item })
            }
            _ => None,
        }
    }

    fn resolve(&self, zones: &DropZones, item: &DragItem, dragged: Option<Rect>, pointer: Point) -> Resolution {
        // Without a registered origin slot, drag a zero-size rect at the pointer.
        let dragged = dragged.unwrap_or_else(|| Rect::from_points(pointer, pointer));
        closest_corners(zones, item, dragged, pointer)
    }

    fn track(&mut self, zones: &DropZones) -> Option<DragEvent> {
        let dragged = self.dragged_rect();
        let pointer = self.sensor.position();
        let Phase::Dragging { item, over, .. } = &self.phase else {
            return None;
        };
        match self.resolve(zones, item, dragged, pointer) {
            Resolution::Target(target) => {
                if over.as_ref() == Some(&target) {
                    return None;
                }
                let item = item.clone();
                if let Phase::Dragging { over, .. } = &mut self.phase {
                    *over = Some(target.clone());
                }
                Some(DragEvent::Over { item, target })
            }
            Resolution::Unchanged => None,
            Resolution::NoCandidate => {
                if let Phase::Dragging { over, .. } = &mut self.phase {
                    *over = None;
                }
                None
            }
        }
    }
}
