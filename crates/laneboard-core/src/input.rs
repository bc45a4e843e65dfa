//! Raw pointer/keyboard input and the press-to-drag activation sensor.

use crate::drag::DragHandle;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Key that aborts an active drag.
pub const CANCEL_KEY: &str = "Escape";

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Pointer event type for unified mouse/touch handling.
///
/// `Down` carries the drag handle under the pointer, if the rendering surface
/// attached one to the pressed element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: MouseButton,
        handle: Option<DragHandle>,
    },
    Up {
        position: Point,
        button: MouseButton,
    },
    Move {
        position: Point,
    },
}

impl PointerEvent {
    /// Left-button press on a handle.
    pub fn press(position: Point, handle: DragHandle) -> Self {
        Self::Down {
            position,
            button: MouseButton::Left,
            handle: Some(handle),
        }
    }

    pub fn move_to(position: Point) -> Self {
        Self::Move { position }
    }

    /// Left-button release.
    pub fn release(position: Point) -> Self {
        Self::Up {
            position,
            button: MouseButton::Left,
        }
    }

    pub fn position(&self) -> Point {
        match self {
            Self::Down { position, .. } | Self::Up { position, .. } | Self::Move { position } => *position,
        }
    }
}

/// Keyboard event type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyEvent {
    Pressed(String),
    Released(String),
}

/// Tracks a single press and decides when it turns into a drag.
///
/// A press only activates once the pointer has travelled at least the
/// activation distance from where it went down.
#[derive(Debug, Clone)]
pub struct PointerSensor {
    activation_distance: f64,
    /// Where the current press started.
    origin: Option<Point>,
    /// Current pointer position.
    position: Point,
    activated: bool,
}

impl PointerSensor {
    pub fn new(activation_distance: f64) -> Self {
        Self {
            activation_distance: activation_distance.max(0.0),
            origin: None,
            position: Point::ZERO,
            activated: false,
        }
    }

    pub fn activation_distance(&self) -> f64 {
        self.activation_distance
    }

    /// Start tracking a press.
    pub fn press(&mut self, position: Point) {
        self.origin = Some(position);
        self.position = position;
        self.activated = false;
    }

    /// Update the pointer position.
    /// Returns true exactly once: on the move that crosses the activation distance.
    pub fn move_to(&mut self, position: Point) -> bool {
        self.position = position;
        match self.origin {
            Some(origin) if !self.activated => {
                if origin.distance(position) >= self.activation_distance {
                    self.activated = true;
                    return true;
                }
                false
            }
            _ => false,
        }
    }

    /// Stop tracking. Returns whether the press had activated.
    pub fn release(&mut self, position: Point) -> bool {
        self.position = position;
        let activated = self.activated;
        self.origin = None;
        self.activated = false;
        activated
    }

    pub fn is_pressed(&self) -> bool {
        self.origin.is_some()
    }

    pub fn is_activated(&self) -> bool {
        self.activated
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn origin(&self) -> Option<Point> {
        self.origin
    }

    /// Pointer travel since the press, if pressed.
    pub fn delta(&self) -> Option<Vec2> {
        self.origin.map(|origin| self.position - origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensor_below_threshold() {
        let mut sensor = PointerSensor::new(8.0);
        sensor.press(Point::new(100.0, 100.0));

        assert!(!sensor.move_to(Point::new(104.0, 104.0)));
        assert!(!sensor.is_activated());
        assert!(!sensor.release(Point::new(104.0, 104.0)));
    }

    #[test]
    fn test_sensor_activates_once() {
        let mut sensor = PointerSensor::new(8.0);
        sensor.press(Point::new(0.0, 0.0));

        assert!(sensor.move_to(Point::new(8.0, 0.0)));
        assert!(sensor.is_activated());
        assert!(!sensor.move_to(Point::new(30.0, 0.0)));
        assert!(sensor.release(Point::new(30.0, 0.0)));
        assert!(!sensor.is_pressed());
    }

    #[test]
    fn test_sensor_uses_distance_from_origin() {
        let mut sensor = PointerSensor::new(8.0);
        sensor.press(Point::new(0.0, 0.0));

        // Jitter back and forth never accumulates.
        for _ in 0..10 {
            assert!(!sensor.move_to(Point::new(5.0, 0.0)));
            assert!(!sensor.move_to(Point::new(-5.0, 0.0)));
        }
        assert!(sensor.move_to(Point::new(6.0, 6.0)));
    }

    #[test]
    fn test_delta() {
        let mut sensor = PointerSensor::new(8.0);
        assert!(sensor.delta().is_none());

        sensor.press(Point::new(100.0, 100.0));
        sensor.move_to(Point::new(150.0, 120.0));
        let delta = sensor.delta().unwrap();
        assert!((delta.x - 50.0).abs() < f64::EPSILON);
        assert!((delta.y - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_pointer_event_position() {
        let event = PointerEvent::release(Point::new(3.0, 4.0));
        assert_eq!(event.position(), Point::new(3.0, 4.0));
    }
}
