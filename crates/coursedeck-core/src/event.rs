//! Page events as the app sees them
//!
//! The browser layer translates DOM events into `UiEvent`s. Element
//! references are already resolved to `ElementId`s.

use coursedeck_bridge::HostEvent;
use coursedeck_catalog::{ElementId, HoverInput};
use coursedeck_tabs::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Space,
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_dom(key: &str) -> Self {
        match key {
            "Enter" => Key::Enter,
            " " | "Spacebar" => Key::Space,
            _ => Key::Other,
        }
    }

    /// Keys that activate a focused control
    pub fn activates(&self) -> bool {
        matches!(self, Key::Enter | Key::Space)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// Registered elements from the click target up, innermost first
    Click { path: Vec<ElementId> },
    /// `target` is set only when the focused element itself is registered
    KeyDown {
        target: Option<ElementId>,
        key: Key,
    },
    TouchStart { touches: Vec<Point> },
    TouchMove { touches: Vec<Point> },
    TouchEnd {
        /// Position of the lifted finger
        changed: Option<Point>,
        /// Fingers still down
        remaining: usize,
    },
    TouchCancel,
    MouseDown {
        x: f64,
        /// Registered elements from the press target up, innermost first
        path: Vec<ElementId>,
    },
    MouseUp { x: f64 },
    LinkHover { link: usize, input: HoverInput },
    Resize,
    Host(HostEvent),
}

impl UiEvent {
    pub fn name(&self) -> &'static str {
        match self {
            UiEvent::Click { .. } => "click",
            UiEvent::KeyDown { .. } => "keydown",
            UiEvent::TouchStart { .. } => "touchstart",
            UiEvent::TouchMove { .. } => "touchmove",
            UiEvent::TouchEnd { .. } => "touchend",
            UiEvent::TouchCancel => "touchcancel",
            UiEvent::MouseDown { .. } => "mousedown",
            UiEvent::MouseUp { .. } => "mouseup",
            UiEvent::LinkHover { .. } => "linkhover",
            UiEvent::Resize => "resize",
            UiEvent::Host(event) => event.as_str(),
        }
    }
}

/// What the browser layer must do with the DOM event afterwards
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventOutcome {
    pub prevent_default: bool,
}

impl EventOutcome {
    pub fn ignored() -> Self {
        Self::default()
    }

    pub fn prevent() -> Self {
        Self {
            prevent_default: true,
        }
    }
}
