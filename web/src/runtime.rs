//! Single-threaded event runtime
//!
//! DOM calls made while the app renders can fire events synchronously (a
//! `focus()` raises `focus` on the target). Those events arrive while the
//! app is already borrowed; they are queued and handled once the current
//! handler returns.

use std::cell::RefCell;
use std::collections::VecDeque;

use coursedeck_core::{App, EventOutcome, EventSink, TimerKey, UiEvent};

#[derive(Debug)]
enum Pending {
    Event(UiEvent),
    Timer(TimerKey),
}

pub struct Runtime {
    app: RefCell<App>,
    queue: RefCell<VecDeque<Pending>>,
}

impl Runtime {
    pub fn new(app: App) -> Self {
        Self {
            app: RefCell::new(app),
            queue: RefCell::new(VecDeque::new()),
        }
    }

    pub fn start(&self, sink: EventSink) {
        match self.app.try_borrow_mut() {
            Ok(mut app) => app.start(sink),
            Err(_) => {
                tracing::warn!("Start requested while the app is busy");
                return;
            }
        }
        self.drain();
    }

    /// Handle an event now, or queue it when the app is busy. Queued events
    /// cannot prevent the default action.
    pub fn dispatch(&self, event: UiEvent) -> EventOutcome {
        let outcome = match self.app.try_borrow_mut() {
            Ok(mut app) => app.handle(event),
            Err(_) => {
                tracing::trace!(event = event.name(), "App busy, event queued");
                self.queue.borrow_mut().push_back(Pending::Event(event));
                return EventOutcome::ignored();
            }
        };
        self.drain();
        outcome
    }

    pub fn fire(&self, key: TimerKey) {
        match self.app.try_borrow_mut() {
            Ok(mut app) => app.fire(key),
            Err(_) => {
                self.queue.borrow_mut().push_back(Pending::Timer(key));
                return;
            }
        }
        self.drain();
    }

    /// Read access for callers outside the event flow
    pub fn with_app<T>(&self, f: impl FnOnce(&App) -> T) -> Option<T> {
        self.app.try_borrow().ok().map(|app| f(&app))
    }

    pub fn queued(&self) -> usize {
        self.queue.borrow().len()
    }

    fn drain(&self) {
        loop {
            let Some(next) = self.queue.borrow_mut().pop_front() else {
                break;
            };

            let Ok(mut app) = self.app.try_borrow_mut() else {
                self.queue.borrow_mut().push_front(next);
                break;
            };

            match next {
                Pending::Event(event) => {
                    app.handle(event);
                }
                Pending::Timer(key) => app.fire(key),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::{Rc, Weak};

    use coursedeck_core::{
        scan_html, Config, CoreError, ElementId, Host, HostEvent, HoverInput, ManualScheduler,
        MemoryStore, MemorySurface, Metrics, Services, Surface,
    };

    use super::*;

    const PAGE: &str = r##"
<div class="container">
  <nav>
    <button class="tab active" data-tab="home">Home</button>
    <button class="tab" data-tab="courses">Courses</button>
  </nav>
  <section class="tab-content" id="home"><p>Welcome</p></section>
  <section class="tab-content" id="courses">
    <div class="course-card">
      <div class="course-links"><a class="course-link" href="/enroll">Записаться</a></div>
    </div>
  </section>
</div>
"##;

    /// Surface that raises a `focus` event on the focused element the way
    /// a browser does, synchronously and through the runtime
    struct FocusingSurface {
        inner: MemorySurface,
        runtime: Rc<RefCell<Weak<Runtime>>>,
        hover_link: ElementId,
    }

    impl Surface for FocusingSurface {
        fn set_class(&self, el: ElementId, class: &str, on: bool) {
            self.inner.set_class(el, class, on)
        }

        fn set_attribute(&self, el: ElementId, name: &str, value: &str) {
            self.inner.set_attribute(el, name, value)
        }

        fn set_style(&self, el: ElementId, property: &str, value: &str) {
            self.inner.set_style(el, property, value)
        }

        fn set_root_style_var(&self, name: &str, value: &str) {
            self.inner.set_root_style_var(name, value)
        }

        fn focus(&self, el: ElementId) {
            self.inner.focus(el);
            if el != self.hover_link {
                return;
            }
            if let Some(runtime) = self.runtime.borrow().upgrade() {
                runtime.dispatch(UiEvent::LinkHover {
                    link: 0,
                    input: HoverInput::Focus,
                });
            }
        }

        fn open(&self, url: &str, target: &str) -> Result<(), CoreError> {
            self.inner.open(url, target)
        }

        fn assign_location(&self, url: &str) {
            self.inner.assign_location(url)
        }

        fn location(&self) -> Option<String> {
            self.inner.location()
        }

        fn metrics(&self) -> Metrics {
            self.inner.metrics()
        }
    }

    fn runtime() -> (Rc<Runtime>, MemorySurface, ManualScheduler) {
        let markup = scan_html(PAGE);
        let hover_link = markup.hover_links[0];
        let surface = MemorySurface::new();
        let scheduler = ManualScheduler::new();
        let handle = Rc::new(RefCell::new(Weak::new()));

        let services = Services {
            host: Host::absent(),
            surface: Box::new(FocusingSurface {
                inner: surface.clone(),
                runtime: Rc::clone(&handle),
                hover_link,
            }),
            scheduler: Box::new(scheduler.clone()),
            store: Box::new(MemoryStore::new()),
        };

        let runtime = Rc::new(Runtime::new(App::new(Config::default(), markup, services)));
        *handle.borrow_mut() = Rc::downgrade(&runtime);
        runtime.start(Rc::new(|_: HostEvent| {}));

        (runtime, surface, scheduler)
    }

    #[test]
    fn test_reentrant_event_is_queued_and_drained() {
        let (runtime, surface, _) = runtime();
        let tab = runtime
            .with_app(|app| app.markup().tab("courses").map(|t| t.el))
            .flatten()
            .unwrap();
        let link = runtime
            .with_app(|app| app.markup().hover_links[0])
            .unwrap();

        // Switching tabs focuses the action link, which raises `focus`
        runtime.dispatch(UiEvent::Click { path: vec![tab] });

        assert_eq!(runtime.queued(), 0);
        assert_eq!(surface.focused(), Some(link));
        assert!(surface.has_class(link, "is-hovered"));
        assert_eq!(
            runtime.with_app(|app| app.active_tab().map(str::to_string)),
            Some(Some("courses".to_string()))
        );
    }

    #[test]
    fn test_timers_fire_through_runtime() {
        let (runtime, surface, scheduler) = runtime();
        let link = runtime
            .with_app(|app| app.markup().hover_links[0])
            .unwrap();

        runtime.dispatch(UiEvent::LinkHover {
            link: 0,
            input: HoverInput::PointerLeave,
        });
        assert!(surface.has_class(link, "is-leaving"));

        for key in scheduler.advance(260) {
            runtime.fire(key);
        }
        assert!(!surface.has_class(link, "is-leaving"));
    }

    #[test]
    fn test_with_app_while_busy() {
        let (runtime, _, _) = runtime();
        let nested = runtime.with_app(|_| runtime.with_app(|app| app.is_started()));
        assert_eq!(nested, Some(Some(true)));
    }
}
