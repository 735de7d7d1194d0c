//! Dismissible info banner

use crate::markup::{BannerMarkup, ElementId};

/// Value stored in session storage once the banner is dismissed
pub const DISMISSED_FLAG: &str = "1";

pub const HIDDEN_CLASS: &str = "hidden";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoBanner {
    pub el: ElementId,
    pub close: Option<ElementId>,
    hidden: bool,
}

impl InfoBanner {
    pub fn new(markup: &BannerMarkup) -> Self {
        Self {
            el: markup.el,
            close: markup.close,
            hidden: false,
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Restore from the stored flag. Anything but the dismissed flag shows
    /// the banner.
    pub fn restore(&mut self, stored: Option<&str>) -> bool {
        self.hidden = stored.map(str::trim) == Some(DISMISSED_FLAG);
        self.hidden
    }

    /// Returns `false` when it was already hidden
    pub fn dismiss(&mut self) -> bool {
        let changed = !self.hidden;
        self.hidden = true;
        changed
    }
}
