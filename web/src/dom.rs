//! Live DOM access
//!
//! The page is scanned once. Every registered element is tagged with
//! `data-cd-ref` so an event target can be mapped back to its `ElementId`
//! by walking up its ancestors.

use coursedeck_core::{CoreError, ElementId, MarkupNode, Metrics, Result, Scan, Surface};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, EventTarget, HtmlElement, Window};

const REF_ATTR: &str = "data-cd-ref";

#[derive(Debug, Clone)]
pub struct DomNode(pub Element);

impl MarkupNode for DomNode {
    fn tag_name(&self) -> String {
        self.0.tag_name().to_ascii_lowercase()
    }

    fn attr(&self, name: &str) -> Option<String> {
        self.0.get_attribute(name)
    }

    fn has_class(&self, class: &str) -> bool {
        self.0.class_list().contains(class)
    }

    fn text(&self) -> String {
        self.0.text_content().unwrap_or_default()
    }

    fn children(&self) -> Vec<Self> {
        let children = self.0.children();
        (0..children.length())
            .filter_map(|i| children.item(i))
            .map(DomNode)
            .collect()
    }
}

/// Tag every scanned element with its id
pub fn mark_elements(scan: &Scan<DomNode>) {
    for (index, node) in scan.nodes.iter().enumerate() {
        if let Err(e) = node.0.set_attribute(REF_ATTR, &index.to_string()) {
            tracing::debug!(error = ?e, "Element reference not set");
        }
    }
}

fn element_id(element: &Element) -> Option<ElementId> {
    element.get_attribute(REF_ATTR)?.parse().ok().map(ElementId)
}

/// Id of the event target itself, if registered
pub fn target_id(target: Option<EventTarget>) -> Option<ElementId> {
    let element = target?.dyn_into::<Element>().ok()?;
    element_id(&element)
}

/// Registered elements from the event target up to the root, innermost first
pub fn registered_path(target: Option<EventTarget>) -> Vec<ElementId> {
    let mut path = Vec::new();
    let mut current = target.and_then(|t| t.dyn_into::<Element>().ok());

    while let Some(element) = current {
        if let Some(id) = element_id(&element) {
            path.push(id);
        }
        current = element.parent_element();
    }
    path
}

pub(crate) fn js_message(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| format!("{:?}", value))
}

pub struct DomSurface {
    window: Window,
    document: Document,
    nodes: Vec<Element>,
    container: Option<ElementId>,
}

impl DomSurface {
    pub fn new(
        window: Window,
        document: Document,
        nodes: Vec<Element>,
        container: Option<ElementId>,
    ) -> Self {
        Self {
            window,
            document,
            nodes,
            container,
        }
    }

    fn node(&self, el: ElementId) -> Option<&Element> {
        let node = self.nodes.get(el.index());
        if node.is_none() {
            tracing::debug!(el = %el, "Unknown element");
        }
        node
    }

    fn html(&self, el: ElementId) -> Option<&HtmlElement> {
        self.node(el)?.dyn_ref::<HtmlElement>()
    }
}

impl Surface for DomSurface {
    fn set_class(&self, el: ElementId, class: &str, on: bool) {
        if let Some(node) = self.node(el) {
            if let Err(e) = node.class_list().toggle_with_force(class, on) {
                tracing::debug!(el = %el, class, error = %js_message(&e), "Class not updated");
            }
        }
    }

    fn set_attribute(&self, el: ElementId, name: &str, value: &str) {
        if let Some(node) = self.node(el) {
            if let Err(e) = node.set_attribute(name, value) {
                tracing::debug!(el = %el, name, error = %js_message(&e), "Attribute not set");
            }
        }
    }

    fn set_style(&self, el: ElementId, property: &str, value: &str) {
        if let Some(node) = self.html(el) {
            if let Err(e) = node.style().set_property(property, value) {
                tracing::debug!(el = %el, property, error = %js_message(&e), "Style not set");
            }
        }
    }

    fn set_root_style_var(&self, name: &str, value: &str) {
        let Some(root) = self
            .document
            .document_element()
            .and_then(|root| root.dyn_into::<HtmlElement>().ok())
        else {
            return;
        };

        if let Err(e) = root.style().set_property(name, value) {
            tracing::debug!(name, error = %js_message(&e), "Root style variable not set");
        }
    }

    fn focus(&self, el: ElementId) {
        if let Some(node) = self.html(el) {
            if let Err(e) = node.focus() {
                tracing::debug!(el = %el, error = %js_message(&e), "Focus failed");
            }
        }
    }

    fn open(&self, url: &str, target: &str) -> Result<()> {
        self.window
            .open_with_url_and_target(url, target)
            .map(|_| ())
            .map_err(|e| CoreError::Open {
                url: url.to_string(),
                message: js_message(&e),
            })
    }

    fn assign_location(&self, url: &str) {
        if let Err(e) = self.window.location().set_href(url) {
            tracing::warn!(url, error = %js_message(&e), "Navigation failed");
        }
    }

    fn location(&self) -> Option<String> {
        self.window.location().href().ok()
    }

    fn metrics(&self) -> Metrics {
        let viewport_width = self
            .window
            .inner_width()
            .ok()
            .and_then(|w| w.as_f64())
            .unwrap_or(0.0);

        let container_width = self
            .container
            .and_then(|el| self.html(el))
            .map(|node| f64::from(node.offset_width()));

        Metrics {
            viewport_width,
            container_width,
            stylesheets: self.document.style_sheets().length(),
        }
    }
}
