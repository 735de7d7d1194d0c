//! Hover animation states of the small course action links
//!
//! Leaving a link starts a short grace period during which `is-leaving`
//! stays on. The caller owns the timer; `apply` says when to start or
//! cancel it.

pub const HOVERED_CLASS: &str = "is-hovered";
pub const LEAVING_CLASS: &str = "is-leaving";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverInput {
    PointerEnter,
    PointerLeave,
    Focus,
    Blur,
    TouchStart,
    TouchEnd,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkVisual {
    pub hovered: bool,
    pub leaving: bool,
}

impl LinkVisual {
    /// Class changes to render, `(class, on)`
    pub fn classes(&self) -> [(&'static str, bool); 2] {
        [(HOVERED_CLASS, self.hovered), (LEAVING_CLASS, self.leaving)]
    }
}

/// What to do with the link's leave timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveTimer {
    Keep,
    /// Start, replacing any pending one
    Schedule,
    Cancel,
}

#[derive(Debug, Clone, Default)]
pub struct LinkHover {
    links: Vec<LinkVisual>,
}

impl LinkHover {
    pub fn new(count: usize) -> Self {
        Self {
            links: vec![LinkVisual::default(); count],
        }
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    #[cfg(test)]
    fn visual(&self, link: usize) -> Option<LinkVisual> {
        self.links.get(link).copied()
    }

    pub fn apply(&mut self, link: usize, input: HoverInput) -> Option<(LinkVisual, LeaveTimer)> {
        let visual = self.links.get_mut(link)?;

        let timer = match input {
            HoverInput::PointerEnter | HoverInput::Focus => {
                visual.hovered = true;
                visual.leaving = false;
                LeaveTimer::Cancel
            }
            HoverInput::PointerLeave | HoverInput::Blur => {
                visual.hovered = false;
                visual.leaving = true;
                LeaveTimer::Schedule
            }
            HoverInput::TouchStart => {
                visual.hovered = true;
                LeaveTimer::Keep
            }
            HoverInput::TouchEnd => {
                visual.hovered = false;
                LeaveTimer::Keep
            }
        };

        Some((*visual, timer))
    }

    /// Leave timer fired
    pub fn clear_leaving(&mut self, link: usize) -> Option<LinkVisual> {
        let visual = self.links.get_mut(link)?;
        visual.leaving = false;
        Some(*visual)
    }
}
