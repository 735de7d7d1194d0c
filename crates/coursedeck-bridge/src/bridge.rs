//! Host capability seam

use std::rc::Rc;

use crate::haptic::ImpactStyle;
use crate::theme::ThemeParams;
use crate::Result;

/// Events the host can push to the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostEvent {
    ThemeChanged,
    MainButtonClicked,
}

impl HostEvent {
    /// Event name used by the host's `onEvent`
    pub fn as_str(&self) -> &'static str {
        match self {
            HostEvent::ThemeChanged => "themeChanged",
            HostEvent::MainButtonClicked => "mainButtonClicked",
        }
    }
}

impl std::fmt::Display for HostEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Receiver for host events. The page is single-threaded, so sinks are `Rc`.
pub type EventSink = Rc<dyn Fn(HostEvent)>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MainButtonCommand {
    SetText(String),
    Show,
    Hide,
    Enable,
}

/// Calls the page may make into the host.
///
/// Implementations report every failure as an error; callers go through
/// [`crate::Host`], which never lets one escape.
pub trait HostBridge {
    /// Whether a host is attached at all
    fn is_available(&self) -> bool;

    fn ready(&self) -> Result<()>;

    fn expand(&self) -> Result<()>;

    fn theme_params(&self) -> Result<Option<ThemeParams>>;

    fn impact_occurred(&self, style: ImpactStyle) -> Result<()>;

    fn selection_changed(&self) -> Result<()>;

    /// Send a serialized message through the host data channel
    fn send_data(&self, payload: &str) -> Result<()>;

    fn main_button(&self, command: &MainButtonCommand) -> Result<()>;

    /// Whether the host supports event subscription
    fn supports_events(&self) -> bool;

    fn subscribe(&self, event: HostEvent, sink: EventSink) -> Result<()>;
}

/// Bridge used when the page runs outside the host
#[derive(Debug, Clone, Copy, Default)]
pub struct NullBridge;

impl HostBridge for NullBridge {
    fn is_available(&self) -> bool {
        false
    }

    fn ready(&self) -> Result<()> {
        Ok(())
    }

    fn expand(&self) -> Result<()> {
        Ok(())
    }

    fn theme_params(&self) -> Result<Option<ThemeParams>> {
        Ok(None)
    }

    fn impact_occurred(&self, _style: ImpactStyle) -> Result<()> {
        Ok(())
    }

    fn selection_changed(&self) -> Result<()> {
        Ok(())
    }

    fn send_data(&self, _payload: &str) -> Result<()> {
        Ok(())
    }

    fn main_button(&self, _command: &MainButtonCommand) -> Result<()> {
        Ok(())
    }

    fn supports_events(&self) -> bool {
        false
    }

    fn subscribe(&self, _event: HostEvent, _sink: EventSink) -> Result<()> {
        Ok(())
    }
}
