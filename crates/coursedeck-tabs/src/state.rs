//! Panel state
//!
//! ```text
//! hidden ──click──▶ visible
//! hidden ──swipe──▶ visible + entering-<dir> ──settle──▶ visible
//! visible ──click──▶ hidden
//! visible ──swipe──▶ hidden + leaving-<dir> ──settle──▶ hidden
//! ```

use serde::{Deserialize, Serialize};

/// Slide direction of a swipe transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Moving to a higher ordinal slides right, lower slides left
    pub fn between(from: usize, to: usize) -> Self {
        if to > from {
            Direction::Right
        } else {
            Direction::Left
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

/// What started a tab switch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionSource {
    Click,
    Swipe,
}

impl TransitionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionSource::Click => "click",
            TransitionSource::Swipe => "swipe",
        }
    }
}

impl std::fmt::Display for TransitionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Transient animation tag carried by a panel during a swipe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PanelAnimation {
    #[default]
    None,
    Entering(Direction),
    Leaving(Direction),
}

impl PanelAnimation {
    /// Every class the animation tags can put on a panel
    pub const CLASSES: [&'static str; 4] = [
        "entering-left",
        "entering-right",
        "leaving-left",
        "leaving-right",
    ];

    pub fn class_name(&self) -> Option<&'static str> {
        match self {
            PanelAnimation::None => None,
            PanelAnimation::Entering(Direction::Left) => Some("entering-left"),
            PanelAnimation::Entering(Direction::Right) => Some("entering-right"),
            PanelAnimation::Leaving(Direction::Left) => Some("leaving-left"),
            PanelAnimation::Leaving(Direction::Right) => Some("leaving-right"),
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.class_name().unwrap_or("none")
    }
}

impl std::fmt::Display for PanelAnimation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PanelAnimation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(PanelAnimation::None),
            "entering-left" => Ok(PanelAnimation::Entering(Direction::Left)),
            "entering-right" => Ok(PanelAnimation::Entering(Direction::Right)),
            "leaving-left" => Ok(PanelAnimation::Leaving(Direction::Left)),
            "leaving-right" => Ok(PanelAnimation::Leaving(Direction::Right)),
            _ => Err(format!("Unknown panel animation: {}", s)),
        }
    }
}

/// Rendered state of one content panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PanelView {
    /// Panel belongs to the active tab
    pub visible: bool,
    pub animation: PanelAnimation,
}

impl PanelView {
    /// Whether the panel box is on screen, including a leaving slide
    pub fn is_displayed(&self) -> bool {
        self.visible || matches!(self.animation, PanelAnimation::Leaving(_))
    }
}
