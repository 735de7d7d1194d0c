//! Swipe recognition
//!
//! Touch: one finger, horizontal travel beyond the trigger distance while the
//! vertical travel stays within the lock. Vertical travel past the lock turns
//! the gesture into a scroll for good. Mouse drags use the same trigger
//! distance without the vertical lock.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Which neighbor a recognized swipe selects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwipeDirection {
    Previous,
    Next,
}

impl SwipeDirection {
    /// Finger moving right (positive delta) reveals the previous tab
    fn from_delta(dx: f64) -> Self {
        if dx > 0.0 {
            SwipeDirection::Previous
        } else {
            SwipeDirection::Next
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwipeConfig {
    /// Horizontal travel that triggers a tab change
    pub trigger_distance: f64,
    /// Vertical travel that turns the gesture into a scroll
    pub vertical_lock: f64,
    /// Horizontal travel after which page scrolling is suppressed
    pub scroll_suppress: f64,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            trigger_distance: 60.0,
            vertical_lock: 40.0,
            scroll_suppress: 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Gesture {
    start: Point,
    candidate: bool,
}

#[derive(Debug, Clone, Default)]
pub struct SwipeRecognizer {
    config: SwipeConfig,
    gesture: Option<Gesture>,
}

impl SwipeRecognizer {
    pub fn new(config: SwipeConfig) -> Self {
        Self {
            config,
            gesture: None,
        }
    }

    pub fn in_progress(&self) -> bool {
        self.gesture.map(|g| g.candidate).unwrap_or(false)
    }

    pub fn cancel(&mut self) {
        self.gesture = None;
    }

    /// `touches` are all points currently on the surface
    pub fn touch_start(&mut self, touches: &[Point]) {
        self.gesture = match touches {
            [start] => Some(Gesture {
                start: *start,
                candidate: true,
            }),
            _ => None,
        };
    }

    /// Returns true when default scrolling should be suppressed
    pub fn touch_move(&mut self, touches: &[Point]) -> bool {
        let current = match touches {
            [current] => *current,
            _ => {
                self.cancel();
                return false;
            }
        };

        let Some(gesture) = self.gesture.as_mut() else {
            return false;
        };

        let dx = current.x - gesture.start.x;
        let dy = current.y - gesture.start.y;

        if dy.abs() > self.config.vertical_lock {
            gesture.candidate = false;
        }

        gesture.candidate && dx.abs() > self.config.scroll_suppress
    }

    /// `end` is the lifted point, `remaining` the number of touches left
    pub fn touch_end(&mut self, end: Option<Point>, remaining: usize) -> Option<SwipeDirection> {
        let gesture = self.gesture.take()?;
        let end = end?;

        if !gesture.candidate || remaining > 0 {
            return None;
        }

        let dx = end.x - gesture.start.x;
        let dy = end.y - gesture.start.y;

        if dx.abs() > self.config.trigger_distance && dy.abs() <= self.config.vertical_lock {
            Some(SwipeDirection::from_delta(dx))
        } else {
            None
        }
    }
}

/// Mouse-drag equivalent of the touch recognizer
#[derive(Debug, Clone, Default)]
pub struct PointerSwipe {
    config: SwipeConfig,
    start_x: Option<f64>,
}

impl PointerSwipe {
    pub fn new(config: SwipeConfig) -> Self {
        Self {
            config,
            start_x: None,
        }
    }

    pub fn mouse_down(&mut self, x: f64) {
        self.start_x = Some(x);
    }

    /// Forget a drag in progress
    pub fn cancel(&mut self) {
        self.start_x = None;
    }

    pub fn mouse_up(&mut self, x: f64) -> Option<SwipeDirection> {
        let dx = x - self.start_x.take()?;
        if dx.abs() > self.config.trigger_distance {
            Some(SwipeDirection::from_delta(dx))
        } else {
            None
        }
    }
}
