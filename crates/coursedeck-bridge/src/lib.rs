//! Coursedeck Host Bridge
//!
//! The page runs inside a chat-platform mini-app host that exposes theming,
//! haptics, a main button and an outbound data channel. None of it is
//! guaranteed to exist:
//! - `HostBridge` is the capability seam, one method per host call
//! - `NullBridge` stands in when the page is opened outside the host
//! - `Host` wraps any bridge so that failures are logged and swallowed

mod bridge;
mod error;
mod haptic;
mod host;
mod message;
mod recording;
mod theme;

pub use bridge::{EventSink, HostBridge, HostEvent, MainButtonCommand, NullBridge};
pub use error::BridgeError;
pub use haptic::{HapticStyle, ImpactStyle};
pub use host::Host;
pub use message::OutboundMessage;
pub use recording::{BridgeCall, RecordingBridge};
pub use theme::ThemeParams;

pub type Result<T> = std::result::Result<T, BridgeError>;
