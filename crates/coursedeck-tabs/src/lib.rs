//! Coursedeck Tab Navigation
//!
//! The catalog page has a handful of mutually exclusive panels selected by
//! tabs. Exactly one tab is active at a time. Tabs switch on click (instantly)
//! or on a horizontal swipe (with a directional slide that settles after a
//! fixed delay).

mod error;
mod gesture;
mod navigator;
mod state;

pub use error::TabError;
pub use gesture::{Point, PointerSwipe, SwipeConfig, SwipeDirection, SwipeRecognizer};
pub use navigator::{Settle, TabNavigator, Transition};
pub use state::{Direction, PanelAnimation, PanelView, TransitionSource};

pub type Result<T> = std::result::Result<T, TabError>;
