//! Tab navigator
//!
//! Owns which tab is active and how each panel is rendered. Pure state: the
//! caller renders the result and schedules the settle timer.

use crate::error::TabError;
use crate::gesture::SwipeDirection;
use crate::state::{Direction, PanelAnimation, PanelView, TransitionSource};
use crate::Result;

#[derive(Debug, Clone)]
struct TabSlot {
    key: String,
    has_panel: bool,
}

/// Panels of a swipe transition waiting for their animation to finish
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settle {
    pub outgoing: usize,
    pub incoming: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Requested tab was already active
    Unchanged { index: usize },
    Switched {
        from: usize,
        to: usize,
        direction: Direction,
        source: TransitionSource,
        /// Earlier swipe that was completed early to make room for this one
        interrupted: Option<Settle>,
    },
}

impl Transition {
    pub fn is_switch(&self) -> bool {
        matches!(self, Transition::Switched { .. })
    }

    /// Whether a settle timer must be scheduled
    pub fn needs_settle(&self) -> bool {
        matches!(
            self,
            Transition::Switched {
                source: TransitionSource::Swipe,
                ..
            }
        )
    }
}

#[derive(Debug, Clone)]
pub struct TabNavigator {
    slots: Vec<TabSlot>,
    panels: Vec<PanelView>,
    active: usize,
    pending: Option<Settle>,
}

impl TabNavigator {
    /// Build from `(key, has_panel)` pairs in tab order.
    ///
    /// The initial tab is `initial` when it names a tab, else the first one.
    pub fn new<I>(tabs: I, initial: Option<&str>) -> Result<Self>
    where
        I: IntoIterator<Item = (String, bool)>,
    {
        let slots: Vec<TabSlot> = tabs
            .into_iter()
            .map(|(key, has_panel)| TabSlot { key, has_panel })
            .collect();

        if slots.is_empty() {
            return Err(TabError::Empty);
        }

        let active = initial
            .and_then(|key| slots.iter().position(|s| s.key == key))
            .unwrap_or(0);

        let panels = slots
            .iter()
            .enumerate()
            .map(|(i, slot)| PanelView {
                visible: i == active && slot.has_panel,
                animation: PanelAnimation::None,
            })
            .collect();

        Ok(Self {
            slots,
            panels,
            active,
            pending: None,
        })
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_key(&self) -> &str {
        &self.slots[self.active].key
    }

    pub fn key(&self, index: usize) -> Option<&str> {
        self.slots.get(index).map(|s| s.key.as_str())
    }

    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.slots.iter().position(|s| s.key == key)
    }

    pub fn panel(&self, index: usize) -> Option<&PanelView> {
        self.panels.get(index)
    }

    pub fn panels(&self) -> &[PanelView] {
        &self.panels
    }

    pub fn is_active(&self, index: usize) -> bool {
        index == self.active
    }

    /// Swipe transition still animating
    pub fn pending_settle(&self) -> Option<Settle> {
        self.pending
    }

    /// Switch to the tab named `key`.
    ///
    /// Activating the current tab is a successful no-op.
    pub fn activate(&mut self, key: &str, source: TransitionSource) -> Result<Transition> {
        let to = self
            .index_of(key)
            .ok_or_else(|| TabError::NotFound(key.to_string()))?;

        if !self.slots[to].has_panel {
            return Err(TabError::MissingPanel(key.to_string()));
        }

        if to == self.active {
            return Ok(Transition::Unchanged { index: to });
        }

        let interrupted = self.settle();
        let from = self.active;
        let direction = Direction::between(from, to);

        for panel in &mut self.panels {
            panel.visible = false;
        }

        if source == TransitionSource::Swipe {
            self.panels[from].animation = PanelAnimation::Leaving(direction);
            self.panels[to].animation = PanelAnimation::Entering(direction);
            self.pending = Some(Settle {
                outgoing: from,
                incoming: to,
            });
        }

        self.panels[to].visible = true;
        self.active = to;

        tracing::debug!(
            from = %self.slots[from].key,
            to = %key,
            source = %source,
            direction = direction.as_str(),
            "Tab transition"
        );

        Ok(Transition::Switched {
            from,
            to,
            direction,
            source,
            interrupted,
        })
    }

    /// Finish a swipe transition: clear animation tags and let the outgoing
    /// panel disappear. Returns the panels that changed.
    pub fn settle(&mut self) -> Option<Settle> {
        let settle = self.pending.take()?;
        self.panels[settle.outgoing].animation = PanelAnimation::None;
        self.panels[settle.incoming].animation = PanelAnimation::None;
        Some(settle)
    }

    /// Tab a swipe in `direction` would select, or `None` at either end
    pub fn neighbor(&self, direction: SwipeDirection) -> Option<&str> {
        let index = match direction {
            SwipeDirection::Previous => self.active.checked_sub(1)?,
            SwipeDirection::Next => self.active + 1,
        };
        self.key(index)
    }
}
