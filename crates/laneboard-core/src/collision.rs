//! Drop zones and closest-corners target resolution.

use crate::board::{ColumnId, TaskId};
use crate::drag::DragItem;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Where a dragged item would land.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DropTarget {
    /// Append to this column.
    Column(ColumnId),
    /// Insert before this task, within its column.
    Task(TaskId),
}

impl DropTarget {
    pub fn id(&self) -> &str {
        match self {
            Self::Column(id) | Self::Task(id) => id,
        }
    }

    pub fn is_column(&self) -> bool {
        matches!(self, Self::Column(_))
    }

    /// Whether this target is the slot the item itself occupies.
    pub fn is_slot_of(&self, item: &DragItem) -> bool {
        match (self, item) {
            (Self::Task(target), DragItem::Task(id)) => target == id,
            (Self::Column(target), DragItem::Column(id)) => target == id,
            _ => false,
        }
    }
}

/// A registered region eligible as a drag target.
#[derive(Debug, Clone, PartialEq)]
pub struct DropZone {
    pub target: DropTarget,
    pub rect: Rect,
}

/// Drop zones in registration order.
///
/// The rendering surface registers one zone per column and one per task slot.
/// Registration order breaks distance ties.
#[derive(Debug, Clone, Default)]
pub struct DropZones {
    zones: Vec<DropZone>,
}

impl DropZones {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a zone. Re-registering a target updates its rect in place.
    pub fn register(&mut self, target: DropTarget, rect: Rect) {
        match self.zones.iter_mut().find(|z| z.target == target) {
            Some(zone) => zone.rect = rect,
            None => self.zones.push(DropZone { target, rect }),
        }
    }

    pub fn register_column(&mut self, id: impl Into<ColumnId>, rect: Rect) {
        self.register(DropTarget::Column(id.into()), rect);
    }

    pub fn register_task(&mut self, id: impl Into<TaskId>, rect: Rect) {
        self.register(DropTarget::Task(id.into()), rect);
    }

    pub fn unregister(&mut self, target: &DropTarget) {
        self.zones.retain(|z| &z.target != target);
    }

    pub fn clear(&mut self) {
        self.zones.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &DropZone> {
        self.zones.iter()
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn rect_of(&self, target: &DropTarget) -> Option<Rect> {
        self.zones.iter().find(|z| &z.target == target).map(|z| z.rect)
    }

    /// The rect of the slot an item occupies.
    pub fn rect_of_item(&self, item: &DragItem) -> Option<Rect> {
        self.zones.iter().find(|z| z.target.is_slot_of(item)).map(|z| z.rect)
    }
}

/// Outcome of resolving a drop target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A new candidate.
    Target(DropTarget),
    /// The item's own slot is closest; keep whatever was there.
    Unchanged,
    /// The pointer is outside every zone.
    NoCandidate,
}

fn corners(rect: Rect) -> [Point; 4] {
    [
        Point::new(rect.x0, rect.y0),
        Point::new(rect.x1, rect.y0),
        Point::new(rect.x0, rect.y1),
        Point::new(rect.x1, rect.y1),
    ]
}

/// Mean distance between the corresponding corners of two rects.
pub fn corner_distance(a: Rect, b: Rect) -> f64 {
    let a = corners(a);
    let b = corners(b);
    let sum: f64 = a.iter().zip(b.iter()).map(|(p, q)| p.distance(*q)).sum();
    sum / 4.0
}

fn is_eligible(zone: &DropZone, item: &DragItem) -> bool {
    match item {
        DragItem::Task(_) => true,
        DragItem::Column(_) => zone.target.is_column(),
    }
}

/// Pick the zone whose corners are closest to the dragged rect.
///
/// Columns can only be dropped on columns; tasks on anything. Ties keep the
/// earliest registered zone.
pub fn closest_corners(zones: &DropZones, item: &DragItem, dragged: Rect, pointer: Point) -> Resolution {
    let inside_any = zones
        .iter()
        .any(|z| is_eligible(z, item) && z.rect.contains(pointer));
    if !inside_any {
        return Resolution::NoCandidate;
    }

    let mut best: Option<(&DropZone, f64)> = None;
    for zone in zones.iter().filter(|z| is_eligible(z, item)) {
        let score = corner_distance(dragged, zone.rect);
        match best {
            Some((_, best_score)) if score >= best_score => {}
            _ => best = Some((zone, score)),
        }
    }

    match best {
        Some((zone, _)) if zone.target.is_slot_of(item) => Resolution::Unchanged,
        Some((zone, _)) => Resolution::Target(zone.target.clone()),
        None => Resolution::NoCandidate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two 100px wide columns, each with two 40px task slots.
    fn zones() -> DropZones {
        let mut zones = DropZones::new();
        zones.register_column("open", Rect::new(0.0, 0.0, 100.0, 400.0));
        zones.register_task("t1", Rect::new(0.0, 40.0, 100.0, 80.0));
        zones.register_task("t2", Rect::new(0.0, 80.0, 100.0, 120.0));
        zones.register_column("review", Rect::new(120.0, 0.0, 220.0, 400.0));
        zones.register_task("t3", Rect::new(120.0, 40.0, 220.0, 80.0));
        zones
    }

    #[test]
    fn test_corner_distance_identical_is_zero() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(corner_distance(r, r).abs() < f64::EPSILON);
    }

    #[test]
    fn test_corner_distance_translation() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(3.0, 4.0, 13.0, 14.0);
        assert!((corner_distance(a, b) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_resolves_task_slot() {
        let item = DragItem::Task("t1".to_string());
        // t1 dragged over t3
        let dragged = Rect::new(122.0, 42.0, 222.0, 82.0);
        let resolution = closest_corners(&zones(), &item, dragged, Point::new(170.0, 60.0));
        assert_eq!(resolution, Resolution::Target(DropTarget::Task("t3".to_string())));
    }

    #[test]
    fn test_resolves_empty_area_to_column() {
        let item = DragItem::Task("t1".to_string());
        // Far below the tasks in the review column, tall rect closest to the column itself.
        let dragged = Rect::new(120.0, 0.0, 220.0, 380.0);
        let resolution = closest_corners(&zones(), &item, dragged, Point::new(170.0, 300.0));
        assert_eq!(resolution, Resolution::Target(DropTarget::Column("review".to_string())));
    }

    #[test]
    fn test_own_slot_is_unchanged() {
        let item = DragItem::Task("t1".to_string());
        let dragged = Rect::new(0.0, 41.0, 100.0, 81.0);
        let resolution = closest_corners(&zones(), &item, dragged, Point::new(50.0, 60.0));
        assert_eq!(resolution, Resolution::Unchanged);
    }

    #[test]
    fn test_outside_all_zones() {
        let item = DragItem::Task("t1".to_string());
        let dragged = Rect::new(500.0, 500.0, 600.0, 540.0);
        let resolution = closest_corners(&zones(), &item, dragged, Point::new(550.0, 520.0));
        assert_eq!(resolution, Resolution::NoCandidate);
    }

    #[test]
    fn test_column_drag_ignores_task_zones() {
        let item = DragItem::Column("open".to_string());
        let dragged = Rect::new(118.0, 0.0, 218.0, 400.0);
        let resolution = closest_corners(&zones(), &item, dragged, Point::new(170.0, 60.0));
        assert_eq!(resolution, Resolution::Target(DropTarget::Column("review".to_string())));
    }

    #[test]
    fn test_ties_go_to_first_registered() {
        let mut zones = DropZones::new();
        zones.register_task("a", Rect::new(0.0, 0.0, 10.0, 10.0));
        zones.register_task("b", Rect::new(0.0, 0.0, 10.0, 10.0));
        let item = DragItem::Task("x".to_string());
        let resolution = closest_corners(&zones, &item, Rect::new(0.0, 0.0, 10.0, 10.0), Point::new(5.0, 5.0));
        assert_eq!(resolution, Resolution::Target(DropTarget::Task("a".to_string())));
    }

    #[test]
    fn test_reregister_keeps_order() {
        let mut zones = zones();
        zones.register_task("t1", Rect::new(0.0, 200.0, 100.0, 240.0));
        assert_eq!(zones.len(), 5);
        assert_eq!(zones.iter().nth(1).unwrap().target, DropTarget::Task("t1".to_string()));
        assert_eq!(
            zones.rect_of(&DropTarget::Task("t1".to_string())),
            Some(Rect::new(0.0, 200.0, 100.0, 240.0))
        );
    }
}
