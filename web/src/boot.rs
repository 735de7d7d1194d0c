//! Page startup

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use coursedeck_core::{scan, App, EventSink, Host, Services, UiEvent};
use gloo::events::EventListener;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Window};

use crate::dom::{mark_elements, DomNode, DomSurface};
use crate::listeners;
use crate::logging::init_logging;
use crate::runtime::Runtime;
use crate::storage::BrowserSessionStore;
use crate::telegram::TelegramBridge;
use crate::timers::BrowserScheduler;
use crate::{parse_config, CONFIG_ELEMENT_ID};

/// Everything that must outlive the startup call
struct Page {
    _runtime: Rc<Runtime>,
    _listeners: Vec<EventListener>,
}

thread_local! {
    static PAGE: RefCell<Option<Page>> = const { RefCell::new(None) };
}

#[wasm_bindgen(start)]
pub fn start() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };

    if document.ready_state() == "loading" {
        let target = document.clone();
        EventListener::once(&target, "DOMContentLoaded", move |_| boot(&window, &document))
            .forget();
    } else {
        boot(&window, &document);
    }
}

fn boot(window: &Window, document: &Document) {
    let source = document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|el| el.text_content());

    let config = match parse_config(source.as_deref()) {
        Ok(config) => {
            init_logging(&config.log_level);
            config
        }
        Err(e) => {
            init_logging("info");
            tracing::warn!(error = %e, "Invalid page configuration, using defaults");
            Default::default()
        }
    };

    let Some(root) = document.document_element() else {
        tracing::error!("Document has no root element");
        return;
    };

    let scanned = scan(&DomNode(root));
    mark_elements(&scanned);

    let markup = scanned.markup;
    let nodes: Vec<Element> = scanned.nodes.into_iter().map(|node| node.0).collect();
    let hover_links: Vec<Element> = markup
        .hover_links
        .iter()
        .filter_map(|el| nodes.get(el.index()).cloned())
        .collect();
    let surface = DomSurface::new(window.clone(), document.clone(), nodes, markup.container);

    let runtime = Rc::new_cyclic(|weak: &Weak<Runtime>| {
        let timers = weak.clone();
        let scheduler = BrowserScheduler::new(move |key| {
            if let Some(runtime) = timers.upgrade() {
                runtime.fire(key);
            }
        });

        let services = Services {
            host: Host::new(Box::new(TelegramBridge::detect())),
            surface: Box::new(surface),
            scheduler: Box::new(scheduler),
            store: Box::new(BrowserSessionStore::new()),
        };
        Runtime::new(App::new(config, markup, services))
    });

    let weak = Rc::downgrade(&runtime);
    let sink: EventSink = Rc::new(move |event| {
        if let Some(runtime) = weak.upgrade() {
            runtime.dispatch(UiEvent::Host(event));
        }
    });
    runtime.start(sink);

    let listeners = listeners::wire(window, document, &hover_links, &runtime);

    PAGE.with(|page| {
        *page.borrow_mut() = Some(Page {
            _runtime: runtime,
            _listeners: listeners,
        });
    });

    tracing::info!("Catalog page ready");
}
