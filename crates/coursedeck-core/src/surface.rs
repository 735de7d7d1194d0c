//! Rendering surface
//!
//! The app never touches the page directly. Every visible change goes
//! through `Surface`, addressed by the `ElementId`s handed out by the markup
//! scan.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use coursedeck_catalog::ElementId;

use crate::error::CoreError;
use crate::Result;

/// Page measurements used by diagnostics
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Metrics {
    pub viewport_width: f64,
    /// Width of the `.container` element, when the page has one
    pub container_width: Option<f64>,
    pub stylesheets: u32,
}

pub trait Surface {
    fn set_class(&self, el: ElementId, class: &str, on: bool);
    fn set_attribute(&self, el: ElementId, name: &str, value: &str);
    fn set_style(&self, el: ElementId, property: &str, value: &str);
    /// Custom property on the document root
    fn set_root_style_var(&self, name: &str, value: &str);
    fn focus(&self, el: ElementId);
    /// Open `url` in the browsing context named `target`
    fn open(&self, url: &str, target: &str) -> Result<()>;
    /// Navigate the current context
    fn assign_location(&self, url: &str);
    /// Current page URL
    fn location(&self) -> Option<String>;
    fn metrics(&self) -> Metrics;
}

#[derive(Debug, Default)]
struct Page {
    classes: BTreeMap<ElementId, BTreeSet<String>>,
    attributes: BTreeMap<(ElementId, String), String>,
    styles: BTreeMap<(ElementId, String), String>,
    root_vars: BTreeMap<String, String>,
    focused: Option<ElementId>,
    opened: Vec<(String, String)>,
    navigated: Vec<String>,
    location: Option<String>,
    metrics: Metrics,
    open_blocked: bool,
}

/// In-memory page. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    page: Rc<RefCell<Page>>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_location(self, location: &str) -> Self {
        self.page.borrow_mut().location = Some(location.to_string());
        self
    }

    pub fn with_metrics(self, metrics: Metrics) -> Self {
        self.page.borrow_mut().metrics = metrics;
        self
    }

    /// Make `open` fail, as a popup blocker would
    pub fn blocking_open(self) -> Self {
        self.page.borrow_mut().open_blocked = true;
        self
    }

    pub fn set_metrics(&self, metrics: Metrics) {
        self.page.borrow_mut().metrics = metrics;
    }

    pub fn has_class(&self, el: ElementId, class: &str) -> bool {
        self.page
            .borrow()
            .classes
            .get(&el)
            .map(|set| set.contains(class))
            .unwrap_or(false)
    }

    pub fn classes(&self, el: ElementId) -> Vec<String> {
        self.page
            .borrow()
            .classes
            .get(&el)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn attribute(&self, el: ElementId, name: &str) -> Option<String> {
        self.page
            .borrow()
            .attributes
            .get(&(el, name.to_string()))
            .cloned()
    }

    pub fn style(&self, el: ElementId, property: &str) -> Option<String> {
        self.page
            .borrow()
            .styles
            .get(&(el, property.to_string()))
            .cloned()
    }

    pub fn root_var(&self, name: &str) -> Option<String> {
        self.page.borrow().root_vars.get(name).cloned()
    }

    pub fn focused(&self) -> Option<ElementId> {
        self.page.borrow().focused
    }

    /// `(url, target)` pairs passed to `open`
    pub fn opened(&self) -> Vec<(String, String)> {
        self.page.borrow().opened.clone()
    }

    pub fn navigated(&self) -> Vec<String> {
        self.page.borrow().navigated.clone()
    }
}

impl Surface for MemorySurface {
    fn set_class(&self, el: ElementId, class: &str, on: bool) {
        let mut page = self.page.borrow_mut();
        let set = page.classes.entry(el).or_default();
        if on {
            set.insert(class.to_string());
        } else {
            set.remove(class);
        }
    }

    fn set_attribute(&self, el: ElementId, name: &str, value: &str) {
        self.page
            .borrow_mut()
            .attributes
            .insert((el, name.to_string()), value.to_string());
    }

    fn set_style(&self, el: ElementId, property: &str, value: &str) {
        self.page
            .borrow_mut()
            .styles
            .insert((el, property.to_string()), value.to_string());
    }

    fn set_root_style_var(&self, name: &str, value: &str) {
        self.page
            .borrow_mut()
            .root_vars
            .insert(name.to_string(), value.to_string());
    }

    fn focus(&self, el: ElementId) {
        self.page.borrow_mut().focused = Some(el);
    }

    fn open(&self, url: &str, target: &str) -> Result<()> {
        let mut page = self.page.borrow_mut();
        if page.open_blocked {
            return Err(CoreError::Open {
                url: url.to_string(),
                message: "blocked".to_string(),
            });
        }
        page.opened.push((url.to_string(), target.to_string()));
        Ok(())
    }

    fn assign_location(&self, url: &str) {
        let mut page = self.page.borrow_mut();
        page.navigated.push(url.to_string());
        page.location = Some(url.to_string());
    }

    fn location(&self) -> Option<String> {
        self.page.borrow().location.clone()
    }

    fn metrics(&self) -> Metrics {
        self.page.borrow().metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classes_and_attributes() {
        let surface = MemorySurface::new();
        let el = ElementId(3);

        surface.set_class(el, "active", true);
        surface.set_class(el, "free", true);
        surface.set_class(el, "active", false);
        assert_eq!(surface.classes(el), vec!["free".to_string()]);

        surface.set_attribute(el, "aria-expanded", "true");
        assert_eq!(surface.attribute(el, "aria-expanded").as_deref(), Some("true"));
        assert_eq!(surface.attribute(ElementId(4), "aria-expanded"), None);
    }

    #[test]
    fn test_clones_share_state() {
        let surface = MemorySurface::new().with_location("https://example.org/");
        let handle = surface.clone();

        surface.assign_location("https://stepik.org/");
        assert_eq!(handle.navigated(), vec!["https://stepik.org/".to_string()]);
        assert_eq!(handle.location().as_deref(), Some("https://stepik.org/"));
    }

    #[test]
    fn test_blocked_open() {
        let surface = MemorySurface::new().blocking_open();
        assert!(surface.open("https://stepik.org/", "_blank").is_err());
        assert!(surface.opened().is_empty());
    }
}
