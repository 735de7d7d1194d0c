//! Coursedeck Core
//!
//! Bootstrap and event dispatch for the catalog page. The app owns all page
//! state; the browser only renders what the app writes through `Surface`.

mod app;
mod config;
mod diagnostics;
mod error;
mod event;
mod store;
mod surface;
mod theme;
mod timers;

pub use app::{App, Services};
pub use config::{Config, LayoutConfig, MainButtonConfig, TimingConfig};
pub use diagnostics::LayoutReport;
pub use error::CoreError;
pub use event::{EventOutcome, Key, UiEvent};
pub use store::{MemoryStore, SessionStore};
pub use surface::{MemorySurface, Metrics, Surface};
pub use theme::apply_theme;
pub use timers::{ManualScheduler, Scheduler, TimerKey};

// Re-export the page components
pub use coursedeck_bridge::{
    BridgeCall, BridgeError, EventSink, HapticStyle, Host, HostBridge, HostEvent, ImpactStyle,
    MainButtonCommand, NullBridge, RecordingBridge, ThemeParams,
};
pub use coursedeck_catalog::{
    scan, scan_html, CardClick, CatalogError, ElementId, HoverInput, MarkupNode, PageMarkup, Role,
    Scan,
};
pub use coursedeck_links::{LinkError, LinkTarget, UtmTagger};
pub use coursedeck_tabs::{Point, SwipeConfig, TabError, Transition, TransitionSource};

pub type Result<T> = std::result::Result<T, CoreError>;
