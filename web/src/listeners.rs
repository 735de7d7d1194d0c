//! DOM event wiring
//!
//! Every listener translates its DOM event into a `UiEvent` and hands it to
//! the runtime. Listeners are removed when dropped, so the returned handles
//! must be kept for the life of the page.

use std::rc::Rc;

use coursedeck_core::{HoverInput, Key, Point, UiEvent};
use gloo::events::{EventListener, EventListenerOptions, EventListenerPhase};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, EventTarget, KeyboardEvent, MouseEvent, TouchList, Window};

use crate::dom::{registered_path, target_id};
use crate::runtime::Runtime;

fn touch_points(list: &TouchList) -> Vec<Point> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .map(|touch| Point::new(f64::from(touch.client_x()), f64::from(touch.client_y())))
        .collect()
}

fn listen(
    target: &EventTarget,
    event_type: &'static str,
    runtime: &Rc<Runtime>,
    translate: impl Fn(&Event) -> Option<UiEvent> + 'static,
) -> EventListener {
    let runtime = Rc::clone(runtime);
    let options = EventListenerOptions {
        phase: EventListenerPhase::Bubble,
        passive: false,
    };

    EventListener::new_with_options(target, event_type, options, move |event: &Event| {
        let Some(ui_event) = translate(event) else {
            return;
        };
        if runtime.dispatch(ui_event).prevent_default {
            event.prevent_default();
        }
    })
}

/// Delegated document listeners: clicks, keys, touch and mouse drags
fn document_listeners(document: &Document, runtime: &Rc<Runtime>) -> Vec<EventListener> {
    let target: &EventTarget = document.as_ref();

    vec![
        listen(target, "click", runtime, |event| {
            Some(UiEvent::Click {
                path: registered_path(event.target()),
            })
        }),
        listen(target, "keydown", runtime, |event| {
            let event = event.dyn_ref::<KeyboardEvent>()?;
            let key = Key::from_dom(&event.key());
            key.activates().then(|| UiEvent::KeyDown {
                target: target_id(event.target()),
                key,
            })
        }),
        listen(target, "touchstart", runtime, |event| {
            let event = event.dyn_ref::<web_sys::TouchEvent>()?;
            Some(UiEvent::TouchStart {
                touches: touch_points(&event.touches()),
            })
        }),
        listen(target, "touchmove", runtime, |event| {
            let event = event.dyn_ref::<web_sys::TouchEvent>()?;
            Some(UiEvent::TouchMove {
                touches: touch_points(&event.touches()),
            })
        }),
        listen(target, "touchend", runtime, |event| {
            let event = event.dyn_ref::<web_sys::TouchEvent>()?;
            Some(UiEvent::TouchEnd {
                changed: touch_points(&event.changed_touches()).into_iter().next(),
                remaining: event.touches().length() as usize,
            })
        }),
        listen(target, "touchcancel", runtime, |_| Some(UiEvent::TouchCancel)),
        listen(target, "mousedown", runtime, |event| {
            let event = event.dyn_ref::<MouseEvent>()?;
            Some(UiEvent::MouseDown {
                x: f64::from(event.client_x()),
                path: registered_path(event.target()),
            })
        }),
        listen(target, "mouseup", runtime, |event| {
            let event = event.dyn_ref::<MouseEvent>()?;
            Some(UiEvent::MouseUp {
                x: f64::from(event.client_x()),
            })
        }),
    ]
}

const HOVER_EVENTS: [(&str, HoverInput); 6] = [
    ("mouseenter", HoverInput::PointerEnter),
    ("mouseleave", HoverInput::PointerLeave),
    ("focus", HoverInput::Focus),
    ("blur", HoverInput::Blur),
    ("touchstart", HoverInput::TouchStart),
    ("touchend", HoverInput::TouchEnd),
];

/// Per-link listeners for the hover emulation of small action links
fn hover_listeners(links: &[Element], runtime: &Rc<Runtime>) -> Vec<EventListener> {
    let mut listeners = Vec::with_capacity(links.len() * HOVER_EVENTS.len());

    for (link, element) in links.iter().enumerate() {
        for (event_type, input) in HOVER_EVENTS {
            let runtime = Rc::clone(runtime);
            // Passive: touch on a link must keep scrolling
            listeners.push(EventListener::new(element, event_type, move |_| {
                runtime.dispatch(UiEvent::LinkHover { link, input });
            }));
        }
    }
    listeners
}

/// Attach every listener the page needs
pub fn wire(
    window: &Window,
    document: &Document,
    hover_links: &[Element],
    runtime: &Rc<Runtime>,
) -> Vec<EventListener> {
    let mut listeners = document_listeners(document, runtime);
    listeners.extend(hover_listeners(hover_links, runtime));

    let resize_runtime = Rc::clone(runtime);
    listeners.push(EventListener::new(window, "resize", move |_| {
        resize_runtime.dispatch(UiEvent::Resize);
    }));

    tracing::debug!(listeners = listeners.len(), "Listeners attached");
    listeners
}
