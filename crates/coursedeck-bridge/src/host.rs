//! Best-effort host access
//!
//! Every host call goes through `Host`. A missing host is silent; a failing
//! call is logged and reported as `None`/`false`, never as an error.

use serde_json::{Map, Value};

use crate::bridge::{EventSink, HostBridge, HostEvent, MainButtonCommand, NullBridge};
use crate::haptic::HapticStyle;
use crate::message::OutboundMessage;
use crate::theme::ThemeParams;
use crate::Result;

pub struct Host {
    bridge: Box<dyn HostBridge>,
}

impl Host {
    pub fn new(bridge: Box<dyn HostBridge>) -> Self {
        Self { bridge }
    }

    /// Host adapter for pages opened outside the mini app
    pub fn absent() -> Self {
        Self::new(Box::new(NullBridge))
    }

    pub fn is_available(&self) -> bool {
        self.bridge.is_available()
    }

    /// Signal readiness and ask for the full-height viewport.
    ///
    /// Returns whether the host is present. `ready` and `expand` are
    /// independent; a failure of either is logged and startup goes on.
    pub fn announce_ready(&self) -> bool {
        if !self.is_available() {
            tracing::info!("Running outside the host, using default colors");
            return false;
        }

        if let Err(e) = self.bridge.ready() {
            tracing::warn!(error = %e, "Host ready signal failed");
        }

        if let Err(e) = self.bridge.expand() {
            tracing::debug!(error = %e, "Host refused to expand");
        }

        true
    }

    /// Current color tokens, if the host provides any
    pub fn theme(&self) -> Option<ThemeParams> {
        if !self.is_available() {
            return None;
        }

        match self.bridge.theme_params() {
            Ok(theme) => theme,
            Err(e) => {
                tracing::debug!(error = %e, "Theme parameters unavailable");
                None
            }
        }
    }

    /// Trigger haptic feedback. Never fails.
    pub fn haptic(&self, style: HapticStyle) {
        if !self.is_available() {
            return;
        }

        let result = match style.impact() {
            Some(impact) => self.bridge.impact_occurred(impact),
            None => self.bridge.selection_changed(),
        };

        if let Err(e) = result {
            tracing::debug!(style = %style, error = %e, "Haptic feedback unavailable");
        }
    }

    /// Send an action to the bot through the host data channel.
    ///
    /// Returns true when the host accepted the message.
    pub fn send(&self, action: &str, extra: Map<String, Value>) -> bool {
        if !self.is_available() {
            return false;
        }

        let message = OutboundMessage::new(action).with_fields(extra);
        match self.deliver(&message) {
            Ok(()) => {
                tracing::info!(action = %message.action, timestamp = message.timestamp, "Sent to bot");
                true
            }
            Err(e) => {
                tracing::warn!(action = %action, error = %e, "Host sendData failed");
                false
            }
        }
    }

    fn deliver(&self, message: &OutboundMessage) -> Result<()> {
        let payload = message.to_json()?;
        self.bridge.send_data(&payload)
    }

    pub fn main_button(&self, command: MainButtonCommand) -> bool {
        if !self.is_available() {
            return false;
        }

        match self.bridge.main_button(&command) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(command = ?command, error = %e, "Main button call failed");
                false
            }
        }
    }

    /// Subscribe to a host event when the host supports subscriptions
    pub fn subscribe(&self, event: HostEvent, sink: EventSink) -> bool {
        if !self.is_available() || !self.bridge.supports_events() {
            return false;
        }

        match self.bridge.subscribe(event, sink) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(event = %event, error = %e, "Host event subscription failed");
                false
            }
        }
    }
}

impl Default for Host {
    fn default() -> Self {
        Self::absent()
    }
}
