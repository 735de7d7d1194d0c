//! In-memory bridge that records every call
//!
//! Clones share the same log, so a test can hand one clone to the app and
//! inspect the other.

use std::cell::RefCell;
use std::rc::Rc;

use crate::bridge::{EventSink, HostBridge, HostEvent, MainButtonCommand};
use crate::error::BridgeError;
use crate::haptic::ImpactStyle;
use crate::theme::ThemeParams;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeCall {
    Ready,
    Expand,
    ThemeParams,
    Impact(ImpactStyle),
    SelectionChanged,
    SendData(String),
    MainButton(MainButtonCommand),
    Subscribe(HostEvent),
}

#[derive(Default)]
struct Recorder {
    calls: Vec<BridgeCall>,
    theme: Option<ThemeParams>,
    failing: bool,
    failing_methods: Vec<&'static str>,
    events: bool,
    sinks: Vec<(HostEvent, EventSink)>,
}

#[derive(Clone)]
pub struct RecordingBridge {
    inner: Rc<RefCell<Recorder>>,
}

impl RecordingBridge {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Recorder {
                events: true,
                ..Recorder::default()
            })),
        }
    }

    pub fn with_theme(self, theme: ThemeParams) -> Self {
        self.inner.borrow_mut().theme = Some(theme);
        self
    }

    /// Make every call fail, as a host that throws would
    pub fn failing(self) -> Self {
        self.inner.borrow_mut().failing = true;
        self
    }

    /// Make only `method` fail, named as the host names it
    pub fn failing_on(self, method: &'static str) -> Self {
        self.inner.borrow_mut().failing_methods.push(method);
        self
    }

    pub fn without_events(self) -> Self {
        self.inner.borrow_mut().events = false;
        self
    }

    pub fn set_theme(&self, theme: ThemeParams) {
        self.inner.borrow_mut().theme = Some(theme);
    }

    pub fn calls(&self) -> Vec<BridgeCall> {
        self.inner.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.inner.borrow_mut().calls.clear();
    }

    /// Payloads passed to `send_data`, in order
    pub fn sent(&self) -> Vec<String> {
        self.inner
            .borrow()
            .calls
            .iter()
            .filter_map(|call| match call {
                BridgeCall::SendData(payload) => Some(payload.clone()),
                _ => None,
            })
            .collect()
    }

    /// Deliver a host event to every subscriber
    pub fn emit(&self, event: HostEvent) -> usize {
        let sinks: Vec<EventSink> = self
            .inner
            .borrow()
            .sinks
            .iter()
            .filter(|(e, _)| *e == event)
            .map(|(_, sink)| Rc::clone(sink))
            .collect();

        for sink in &sinks {
            sink(event);
        }
        sinks.len()
    }

    fn record(&self, call: BridgeCall, method: &'static str) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        inner.calls.push(call);
        if inner.failing || inner.failing_methods.contains(&method) {
            return Err(BridgeError::call(method, "host threw"));
        }
        Ok(())
    }
}

impl Default for RecordingBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl HostBridge for RecordingBridge {
    fn is_available(&self) -> bool {
        true
    }

    fn ready(&self) -> Result<()> {
        self.record(BridgeCall::Ready, "ready")
    }

    fn expand(&self) -> Result<()> {
        self.record(BridgeCall::Expand, "expand")
    }

    fn theme_params(&self) -> Result<Option<ThemeParams>> {
        self.record(BridgeCall::ThemeParams, "themeParams")?;
        Ok(self.inner.borrow().theme.clone())
    }

    fn impact_occurred(&self, style: ImpactStyle) -> Result<()> {
        self.record(BridgeCall::Impact(style), "impactOccurred")
    }

    fn selection_changed(&self) -> Result<()> {
        self.record(BridgeCall::SelectionChanged, "selectionChanged")
    }

    fn send_data(&self, payload: &str) -> Result<()> {
        self.record(BridgeCall::SendData(payload.to_string()), "sendData")
    }

    fn main_button(&self, command: &MainButtonCommand) -> Result<()> {
        self.record(BridgeCall::MainButton(command.clone()), "MainButton")
    }

    fn supports_events(&self) -> bool {
        self.inner.borrow().events
    }

    fn subscribe(&self, event: HostEvent, sink: EventSink) -> Result<()> {
        self.record(BridgeCall::Subscribe(event), "onEvent")?;
        self.inner.borrow_mut().sinks.push((event, sink));
        Ok(())
    }
}
