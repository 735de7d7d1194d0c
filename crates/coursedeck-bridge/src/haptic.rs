//! Haptic feedback categories

use serde::{Deserialize, Serialize};

/// Feedback requested by the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HapticStyle {
    Light,
    Medium,
    Heavy,
    /// Selection change; uses a different host call than the impacts
    Selection,
}

/// Impact categories understood by the host's `impactOccurred`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactStyle {
    Light,
    Medium,
    Heavy,
}

impl HapticStyle {
    /// The impact to request, or `None` for a selection change
    pub fn impact(self) -> Option<ImpactStyle> {
        match self {
            HapticStyle::Light => Some(ImpactStyle::Light),
            HapticStyle::Medium => Some(ImpactStyle::Medium),
            HapticStyle::Heavy => Some(ImpactStyle::Heavy),
            HapticStyle::Selection => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HapticStyle::Light => "light",
            HapticStyle::Medium => "medium",
            HapticStyle::Heavy => "heavy",
            HapticStyle::Selection => "selection",
        }
    }
}

impl ImpactStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImpactStyle::Light => "light",
            ImpactStyle::Medium => "medium",
            ImpactStyle::Heavy => "heavy",
        }
    }
}

impl std::fmt::Display for HapticStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for HapticStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "light" => Ok(HapticStyle::Light),
            "medium" => Ok(HapticStyle::Medium),
            "heavy" => Ok(HapticStyle::Heavy),
            "selection" => Ok(HapticStyle::Selection),
            _ => Err(format!("Unknown haptic style: {}", s)),
        }
    }
}
