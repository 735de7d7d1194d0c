//! Page application state
//!
//! `App` owns every view-state object of the page. Events come in through
//! `handle`, elapsed timers through `fire`, and every state change is
//! rendered through the `Surface` in the same call.

use coursedeck_bridge::{EventSink, HapticStyle, Host, HostEvent, MainButtonCommand};
use coursedeck_catalog::{
    CardClick, CardSet, CatalogError, ElementId, GroupSet, GroupToggle, HoverInput, InfoBanner,
    LeaveTimer, LinkHover, PageMarkup, Role, DISMISSED_FLAG, HIDDEN_CLASS,
};
use coursedeck_links::LinkTarget;
use coursedeck_tabs::{
    PanelAnimation, PointerSwipe, SwipeDirection, SwipeRecognizer, TabError, TabNavigator,
    Transition, TransitionSource,
};
use serde_json::Map;
use url::Url;

use crate::config::Config;
use crate::diagnostics::LayoutReport;
use crate::event::{EventOutcome, UiEvent};
use crate::store::SessionStore;
use crate::surface::Surface;
use crate::theme::apply_theme;
use crate::timers::{Scheduler, TimerKey};
use crate::Result;

/// Tab the courses button switches to
const COURSES_TAB: &str = "courses";

const ACTIVE_CLASS: &str = "active";
const COLLAPSED_CLASS: &str = "collapsed";
const FREE_CLASS: &str = "free";

/// Page-side services the app renders and schedules through
pub struct Services {
    pub host: Host,
    pub surface: Box<dyn Surface>,
    pub scheduler: Box<dyn Scheduler>,
    pub store: Box<dyn SessionStore>,
}

pub struct App {
    config: Config,
    markup: PageMarkup,
    host: Host,
    surface: Box<dyn Surface>,
    scheduler: Box<dyn Scheduler>,
    store: Box<dyn SessionStore>,
    tabs: Option<TabNavigator>,
    cards: CardSet,
    groups: GroupSet,
    hover: LinkHover,
    banner: Option<InfoBanner>,
    swipe: SwipeRecognizer,
    pointer: PointerSwipe,
    host_ready: bool,
    started: bool,
}

impl App {
    pub fn new(config: Config, markup: PageMarkup, services: Services) -> Self {
        let tabs = markup
            .tabs
            .iter()
            .map(|t| (t.key.clone(), markup.panel(&t.key).is_some()))
            .collect::<Vec<_>>();

        let tabs = match TabNavigator::new(tabs, markup.initial_tab()) {
            Ok(navigator) => Some(navigator),
            Err(e) => {
                tracing::debug!(error = %e, "Page has no tab navigation");
                None
            }
        };

        let groups = GroupSet::from_markup(&markup);
        let hover = LinkHover::new(markup.hover_links.len());
        let banner = markup
            .banner
            .as_ref()
            .filter(|b| b.close.is_some())
            .map(InfoBanner::new);

        Self {
            swipe: SwipeRecognizer::new(config.gestures),
            pointer: PointerSwipe::new(config.gestures),
            config,
            markup,
            host: services.host,
            surface: services.surface,
            scheduler: services.scheduler,
            store: services.store,
            tabs,
            cards: CardSet::default(),
            groups,
            hover,
            banner,
            host_ready: false,
            started: false,
        }
    }

    /// Run the startup sequence once.
    ///
    /// `sink` receives host events; the caller feeds them back through
    /// `handle` as `UiEvent::Host`.
    pub fn start(&mut self, sink: EventSink) {
        if self.started {
            tracing::debug!("App already started");
            return;
        }
        self.started = true;

        self.tag_links();
        self.mark_free_courses();
        self.init_host(sink);
        self.restore_banner();
        self.render_tabs();
        self.init_special_buttons();
        self.init_groups();
        self.init_cards();
        self.run_diagnostics();

        tracing::info!(
            tabs = self.tabs.as_ref().map(TabNavigator::len).unwrap_or(0),
            cards = self.cards.len(),
            groups = self.groups.len(),
            host = self.host_ready,
            "Catalog page initialized"
        );
    }

    fn tag_links(&mut self) {
        let tagger = match self.config.tagger() {
            Ok(tagger) => tagger,
            Err(e) => {
                tracing::warn!(error = %e, "Link tagging disabled");
                return;
            }
        };

        let base = self
            .surface
            .location()
            .and_then(|location| Url::parse(&location).ok());

        for write in self.markup.tag_links(&tagger, base.as_ref()) {
            self.surface.set_attribute(write.el, write.name, &write.value);
        }
    }

    fn mark_free_courses(&mut self) {
        self.cards = CardSet::from_markup(&self.markup, &self.config.enroll_matcher());
        for card in self.cards.free_cards() {
            self.surface.set_class(card.el, FREE_CLASS, true);
        }
    }

    fn init_host(&mut self, sink: EventSink) {
        self.host_ready = self.host.announce_ready();
        if !self.host_ready {
            return;
        }

        self.apply_host_theme();
        self.init_main_button();

        for event in [HostEvent::ThemeChanged, HostEvent::MainButtonClicked] {
            if !self.host.subscribe(event, sink.clone()) {
                tracing::debug!(event = %event, "Host event not subscribed");
            }
        }
    }

    fn apply_host_theme(&self) {
        if let Some(theme) = self.host.theme() {
            apply_theme(self.surface.as_ref(), &theme);
        }
    }

    fn init_main_button(&self) {
        let settings = &self.config.main_button;
        if !settings.enabled {
            return;
        }

        self.host
            .main_button(MainButtonCommand::SetText(settings.text.clone()));
        self.host.main_button(MainButtonCommand::Enable);
        self.sync_main_button();
    }

    /// Show the main button only on its configured tab
    fn sync_main_button(&self) {
        if !self.host_ready || !self.config.main_button.enabled {
            return;
        }

        let visible = self
            .active_tab()
            .map(|key| key == self.config.main_button.visible_on_tab)
            .unwrap_or(false);

        let command = if visible {
            MainButtonCommand::Show
        } else {
            MainButtonCommand::Hide
        };
        self.host.main_button(command);
    }

    fn restore_banner(&mut self) {
        let Some(banner) = self.banner.as_mut() else {
            return;
        };

        let stored = if self.config.persist_alert_dismiss {
            match self.store.get(&self.config.alert_storage_key) {
                Ok(value) => value,
                Err(e) => {
                    tracing::debug!(error = %e, "Banner state unavailable");
                    None
                }
            }
        } else {
            None
        };

        let hidden = banner.restore(stored.as_deref());
        self.surface.set_class(banner.el, HIDDEN_CLASS, hidden);
    }

    fn init_special_buttons(&self) {
        tracing::debug!(
            courses = self.markup.courses_button.is_some(),
            certificate = self.markup.certificate_button.is_some() && self.host_ready,
            "Special buttons"
        );
    }

    fn init_groups(&self) {
        for group in self.groups.snapshot() {
            self.render_group(&group);
        }
    }

    fn init_cards(&self) {
        for card in self.cards.iter() {
            self.surface.set_attribute(card.el, "role", "link");
            if card.needs_tabindex {
                self.surface.set_attribute(card.el, "tabindex", "0");
            }
            self.surface.set_style(card.el, "cursor", "pointer");
        }
    }

    /// Log viewport and layout facts
    pub fn run_diagnostics(&self) -> LayoutReport {
        let report = LayoutReport::new(
            self.surface.metrics(),
            self.markup.cards.len(),
            &self.config.layout,
        );
        report.log();
        report
    }

    pub fn handle(&mut self, event: UiEvent) -> EventOutcome {
        tracing::trace!(event = event.name(), "Page event");

        match event {
            UiEvent::Click { path } => self.on_click(&path),
            UiEvent::KeyDown { target, key } => match target {
                Some(el) if key.activates() => self.on_activation_key(el),
                _ => EventOutcome::ignored(),
            },
            UiEvent::TouchStart { touches } => {
                self.swipe.touch_start(&touches);
                EventOutcome::ignored()
            }
            UiEvent::TouchMove { touches } => EventOutcome {
                prevent_default: self.swipe.touch_move(&touches),
            },
            UiEvent::TouchEnd { changed, remaining } => {
                if let Some(direction) = self.swipe.touch_end(changed, remaining) {
                    self.swipe_to(direction);
                }
                EventOutcome::ignored()
            }
            UiEvent::TouchCancel => {
                self.swipe.cancel();
                EventOutcome::ignored()
            }
            UiEvent::MouseDown { x, path } => {
                // Drags outside the panels select text, not tabs
                let in_panel = path.iter().any(|&el| {
                    self.markup
                        .roles(el)
                        .iter()
                        .any(|role| matches!(role, Role::Panel(_)))
                });
                if in_panel {
                    self.pointer.mouse_down(x);
                } else {
                    self.pointer.cancel();
                }
                EventOutcome::ignored()
            }
            UiEvent::MouseUp { x } => {
                if let Some(direction) = self.pointer.mouse_up(x) {
                    self.swipe_to(direction);
                }
                EventOutcome::ignored()
            }
            UiEvent::LinkHover { link, input } => {
                self.on_link_hover(link, input);
                EventOutcome::ignored()
            }
            UiEvent::Resize => {
                self.scheduler
                    .schedule(TimerKey::Resize, self.config.timing.resize_debounce_ms);
                EventOutcome::ignored()
            }
            UiEvent::Host(event) => {
                self.on_host_event(event);
                EventOutcome::ignored()
            }
        }
    }

    /// A timer scheduled by the app elapsed
    pub fn fire(&mut self, key: TimerKey) {
        match key {
            TimerKey::TabSettle => {
                let settled = self.tabs.as_mut().and_then(TabNavigator::settle);
                if settled.is_some() {
                    self.render_tabs();
                }
            }
            TimerKey::LinkLeave(link) => {
                if let Some(visual) = self.hover.clear_leaving(link) {
                    self.render_link(link, visual.classes());
                }
            }
            TimerKey::Resize => {
                self.run_diagnostics();
            }
        }
    }

    fn on_click(&mut self, path: &[ElementId]) -> EventOutcome {
        for &el in path {
            let roles = self.markup.roles(el).to_vec();
            if roles.iter().any(|r| matches!(r, Role::Card(_))) {
                break;
            }

            for role in roles {
                match role {
                    Role::Tab(index) => {
                        if let Some(key) = self.markup.tabs.get(index).map(|t| t.key.clone()) {
                            let _ = self.activate_tab(&key, TransitionSource::Click);
                        }
                        return EventOutcome::ignored();
                    }
                    Role::GroupToggle(group) => {
                        let _ = self.toggle_group(group);
                        return EventOutcome::prevent();
                    }
                    Role::BannerClose => {
                        self.dismiss_banner();
                        return EventOutcome::prevent();
                    }
                    Role::CoursesButton => {
                        let _ = self.activate_tab(COURSES_TAB, TransitionSource::Click);
                        self.host.haptic(HapticStyle::Medium);
                        return EventOutcome::prevent();
                    }
                    Role::CertificateButton if self.host_ready => {
                        self.send_to_bot("get_certificate");
                        self.host.haptic(HapticStyle::Medium);
                        return EventOutcome::prevent();
                    }
                    _ => {}
                }
            }
        }

        let click = self
            .cards
            .resolve_click(path.iter().map(|&el| self.markup.roles(el)));
        self.follow_card(click);
        EventOutcome::ignored()
    }

    fn on_activation_key(&mut self, el: ElementId) -> EventOutcome {
        let roles = self.markup.roles(el).to_vec();
        for role in roles {
            match role {
                Role::Card(card) => {
                    let click = self.cards.navigate(card);
                    self.follow_card(click);
                    return EventOutcome::prevent();
                }
                Role::GroupToggle(group) => {
                    let _ = self.toggle_group(group);
                    return EventOutcome::prevent();
                }
                _ => {}
            }
        }
        EventOutcome::ignored()
    }

    fn follow_card(&self, click: CardClick) {
        match click {
            CardClick::Navigate { card, url, target } => {
                tracing::info!(card, url = %url, target = %target, "Opening course");
                self.open(&url, &target);
            }
            CardClick::NoDestination { card } => {
                tracing::debug!(card, "Course card has no destination");
            }
            CardClick::Nested { .. } | CardClick::Outside => {}
        }
    }

    /// Open a destination, falling back to same-context navigation when the
    /// browser refuses
    fn open(&self, url: &str, target: &LinkTarget) {
        if let Err(e) = self.surface.open(url, target.as_str()) {
            tracing::warn!(url = %url, error = %e, "Open failed, navigating in place");
            self.surface.assign_location(url);
        }
    }

    fn on_link_hover(&mut self, link: usize, input: HoverInput) {
        let Some((visual, timer)) = self.hover.apply(link, input) else {
            tracing::debug!(link, "Unknown action link");
            return;
        };

        self.render_link(link, visual.classes());

        let key = TimerKey::LinkLeave(link);
        match timer {
            LeaveTimer::Schedule => self
                .scheduler
                .schedule(key, self.config.timing.hover_grace_ms),
            LeaveTimer::Cancel => self.scheduler.cancel(key),
            LeaveTimer::Keep => {}
        }
    }

    fn render_link(&self, link: usize, classes: [(&'static str, bool); 2]) {
        if let Some(&el) = self.markup.hover_links.get(link) {
            for (class, on) in classes {
                self.surface.set_class(el, class, on);
            }
        }
    }

    fn on_host_event(&mut self, event: HostEvent) {
        match event {
            HostEvent::ThemeChanged => self.apply_host_theme(),
            HostEvent::MainButtonClicked => {
                self.send_to_bot("main_button_clicked");
            }
        }
    }

    /// Send an action to the bot. Returns false without a host.
    pub fn send_to_bot(&self, action: &str) -> bool {
        self.host.send(action, Map::new())
    }

    /// Trigger haptic feedback, silently ignored without a host
    pub fn haptic(&self, style: HapticStyle) {
        self.host.haptic(style);
    }

    fn swipe_to(&mut self, direction: SwipeDirection) {
        let Some(key) = self
            .tabs
            .as_ref()
            .and_then(|tabs| tabs.neighbor(direction))
            .map(str::to_string)
        else {
            tracing::debug!(direction = ?direction, "Swipe past the last tab");
            return;
        };

        let _ = self.activate_tab(&key, TransitionSource::Swipe);
    }

    /// Switch the active tab and render the change.
    ///
    /// Activating the current tab succeeds without side effects.
    pub fn activate_tab(&mut self, key: &str, source: TransitionSource) -> Result<Transition> {
        let result = match self.tabs.as_mut() {
            Some(tabs) => tabs.activate(key, source),
            None => Err(TabError::NotFound(key.to_string())),
        };

        let transition = match result {
            Ok(transition) => transition,
            Err(e) => {
                tracing::error!(tab = %key, error = %e, "Tab switch failed");
                return Err(e.into());
            }
        };

        let Transition::Switched {
            to, interrupted, ..
        } = transition
        else {
            return Ok(transition);
        };

        if interrupted.is_some() {
            self.scheduler.cancel(TimerKey::TabSettle);
        }

        self.render_tabs();

        if transition.needs_settle() {
            self.scheduler
                .schedule(TimerKey::TabSettle, self.config.timing.tab_settle_ms);
        }

        let focus = self
            .tabs
            .as_ref()
            .and_then(|tabs| tabs.key(to))
            .and_then(|key| self.markup.panel(key))
            .and_then(|panel| panel.first_focusable);
        if let Some(el) = focus {
            self.surface.focus(el);
        }

        self.host.haptic(HapticStyle::Light);
        self.sync_main_button();

        tracing::info!(tab = %key, source = %source, "Switched tab");
        Ok(transition)
    }

    fn render_tabs(&self) {
        let Some(tabs) = self.tabs.as_ref() else {
            return;
        };

        for (index, tab) in self.markup.tabs.iter().enumerate() {
            self.surface
                .set_class(tab.el, ACTIVE_CLASS, tabs.is_active(index));

            let (Some(panel), Some(view)) = (self.markup.panel(&tab.key), tabs.panel(index))
            else {
                continue;
            };

            self.surface.set_class(panel.el, ACTIVE_CLASS, view.visible);
            let current = view.animation.class_name();
            for class in PanelAnimation::CLASSES {
                self.surface
                    .set_class(panel.el, class, current == Some(class));
            }
        }
    }

    /// Collapse or expand a course group
    pub fn toggle_group(&mut self, group: usize) -> Result<GroupToggle> {
        let toggle = match self.groups.toggle(group) {
            Ok(toggle) => toggle,
            Err(e) => {
                tracing::error!(group, error = %e, "Group toggle failed");
                return Err(e.into());
            }
        };

        self.render_group(&toggle);
        self.host.haptic(HapticStyle::Light);
        Ok(toggle)
    }

    fn render_group(&self, group: &GroupToggle) {
        self.surface
            .set_class(group.container, COLLAPSED_CLASS, group.collapsed);
        if let Some(toggle) = group.toggle {
            self.surface
                .set_attribute(toggle, "aria-expanded", group.aria_expanded());
        }
    }

    /// Hide the info banner, remembering it when configured to
    pub fn dismiss_banner(&mut self) -> Result<()> {
        let banner = self
            .banner
            .as_mut()
            .ok_or(CatalogError::NoBanner)?;

        banner.dismiss();
        self.surface.set_class(banner.el, HIDDEN_CLASS, true);

        if self.config.persist_alert_dismiss {
            if let Err(e) = self
                .store
                .set(&self.config.alert_storage_key, DISMISSED_FLAG)
            {
                tracing::debug!(error = %e, "Banner state not saved");
            }
        }
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn markup(&self) -> &PageMarkup {
        &self.markup
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn host_ready(&self) -> bool {
        self.host_ready
    }

    pub fn active_tab(&self) -> Option<&str> {
        self.tabs.as_ref().map(TabNavigator::active_key)
    }

    pub fn tabs(&self) -> Option<&TabNavigator> {
        self.tabs.as_ref()
    }

    pub fn cards(&self) -> &CardSet {
        &self.cards
    }

    pub fn groups(&self) -> &GroupSet {
        &self.groups
    }

    pub fn banner(&self) -> Option<&InfoBanner> {
        self.banner.as_ref()
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("active_tab", &self.active_tab())
            .field("cards", &self.cards.len())
            .field("groups", &self.groups.len())
            .field("host_ready", &self.host_ready)
            .field("started", &self.started)
            .finish()
    }
}


#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use coursedeck_bridge::{BridgeCall, ImpactStyle, RecordingBridge, ThemeParams};
    use coursedeck_catalog::scan_html;
    use coursedeck_tabs::{Point, SwipeDirection};

    use super::*;
    use crate::error::CoreError;
    use crate::event::Key;
    use crate::store::MemoryStore;
    use crate::surface::{MemorySurface, Metrics};
    use crate::timers::ManualScheduler;

    const PAGE: &str = r##"
<!DOCTYPE html>
<html><body>
<div class="container">
  <div id="stepik-alert">Courses open on Stepik <button id="stepik-alert-close">x</button></div>
  <nav>
    <button class="tab active" data-tab="home">Home</button>
    <button class="tab" data-tab="courses">Courses</button>
    <button class="tab" data-tab="about">About</button>
  </nav>
  <section class="tab-content active" id="home">
    <a id="courses-btn" href="#courses">All courses</a>
    <a id="certificate-btn" href="#">Certificate</a>
  </section>
  <section class="tab-content" id="courses">
    <div class="course-group collapsed">
      <button class="group-toggle">Python</button>
      <div class="course-card" data-href="https://stepik.org/course/58852">
        <h3>Python basics</h3>
        <div class="course-links">
          <a class="course-link" href="https://stepik.org/course/58852/promo" target="_blank">Записаться</a>
        </div>
      </div>
      <div class="course-card">
        <a class="course-card-link" href="/paid/rust" target="_blank">Rust</a>
      </div>
      <div class="course-card" data-href="#"><h3>Soon</h3></div>
    </div>
  </section>
  <section class="tab-content" id="about"><p>About us</p></section>
</div>
</body></html>
"##;

    const LOCATION: &str = "https://catalog.example/index.html";

    struct Harness {
        app: App,
        surface: MemorySurface,
        scheduler: ManualScheduler,
        store: MemoryStore,
        host_events: Rc<RefCell<Vec<HostEvent>>>,
    }

    /// Route app logs to the test output; `RUST_LOG` picks the level
    fn init_test_logging() {
        use tracing_subscriber::EnvFilter;

        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    impl Harness {
        fn new(config: Config, bridge: Option<RecordingBridge>, store: MemoryStore) -> Self {
            init_test_logging();
            let surface = MemorySurface::new()
                .with_location(LOCATION)
                .with_metrics(Metrics {
                    viewport_width: 390.0,
                    container_width: Some(370.0),
                    stylesheets: 1,
                });
            let scheduler = ManualScheduler::new();

            let host = match bridge {
                Some(bridge) => Host::new(Box::new(bridge)),
                None => Host::absent(),
            };

            let services = Services {
                host,
                surface: Box::new(surface.clone()),
                scheduler: Box::new(scheduler.clone()),
                store: Box::new(store.clone()),
            };

            let mut app = App::new(config, scan_html(PAGE), services);

            let host_events = Rc::new(RefCell::new(Vec::new()));
            let events = Rc::clone(&host_events);
            app.start(Rc::new(move |event: HostEvent| {
                events.borrow_mut().push(event)
            }));

            Self {
                app,
                surface,
                scheduler,
                store,
                host_events,
            }
        }

        fn with_host(bridge: &RecordingBridge) -> Self {
            Self::new(Config::default(), Some(bridge.clone()), MemoryStore::new())
        }

        fn without_host() -> Self {
            Self::new(Config::default(), None, MemoryStore::new())
        }

        fn markup(&self) -> &PageMarkup {
            self.app.markup()
        }

        fn tab_el(&self, key: &str) -> ElementId {
            self.markup().tab(key).unwrap().el
        }

        fn panel_el(&self, key: &str) -> ElementId {
            self.markup().panel(key).unwrap().el
        }

        fn click(&mut self, path: Vec<ElementId>) -> EventOutcome {
            self.app.handle(UiEvent::Click { path })
        }

        fn swipe(&mut self, start: Point, end: Point) {
            self.app.handle(UiEvent::TouchStart {
                touches: vec![start],
            });
            self.app.handle(UiEvent::TouchMove {
                touches: vec![end],
            });
            self.app.handle(UiEvent::TouchEnd {
                changed: Some(end),
                remaining: 0,
            });
        }

        fn run_timers(&mut self, ms: u64) {
            for key in self.scheduler.advance(ms) {
                self.app.fire(key);
            }
        }

        fn active_tabs(&self) -> Vec<String> {
            self.markup()
                .tabs
                .iter()
                .filter(|t| self.surface.has_class(t.el, "active"))
                .map(|t| t.key.clone())
                .collect()
        }

        fn visible_panels(&self) -> Vec<String> {
            self.markup()
                .panels
                .iter()
                .filter(|p| self.surface.has_class(p.el, "active"))
                .map(|p| p.key.clone())
                .collect()
        }
    }

    fn impacts(bridge: &RecordingBridge) -> Vec<ImpactStyle> {
        bridge
            .calls()
            .into_iter()
            .filter_map(|call| match call {
                BridgeCall::Impact(style) => Some(style),
                _ => None,
            })
            .collect()
    }

    fn sent_actions(bridge: &RecordingBridge) -> Vec<String> {
        bridge
            .sent()
            .iter()
            .map(|payload| {
                let value: serde_json::Value = serde_json::from_str(payload).unwrap();
                value["action"].as_str().unwrap().to_string()
            })
            .collect()
    }

    #[test]
    fn test_start_renders_initial_state() {
        let h = Harness::without_host();
        let markup = h.markup();

        assert!(h.app.is_started());
        assert_eq!(h.app.active_tab(), Some("home"));
        assert_eq!(h.active_tabs(), vec!["home"]);
        assert_eq!(h.visible_panels(), vec!["home"]);

        for card in &markup.cards {
            assert_eq!(h.surface.attribute(card.el, "role").as_deref(), Some("link"));
            assert_eq!(h.surface.attribute(card.el, "tabindex").as_deref(), Some("0"));
            assert_eq!(h.surface.style(card.el, "cursor").as_deref(), Some("pointer"));
        }

        let free: Vec<bool> = markup
            .cards
            .iter()
            .map(|c| h.surface.has_class(c.el, "free"))
            .collect();
        assert_eq!(free, vec![true, false, false]);

        let group = &markup.groups[0];
        assert!(h.surface.has_class(group.el, "collapsed"));
        assert_eq!(
            h.surface.attribute(group.toggle.unwrap(), "aria-expanded").as_deref(),
            Some("false")
        );

        let banner = markup.banner.as_ref().unwrap();
        assert!(!h.surface.has_class(banner.el, "hidden"));
    }

    #[test]
    fn test_start_tags_links() {
        let h = Harness::without_host();
        let markup = h.markup();

        let promo = markup.hover_links[0];
        assert_eq!(
            h.surface.attribute(promo, "href").as_deref(),
            Some("https://stepik.org/course/58852/promo?utm_source=pp_tma")
        );
        assert_eq!(
            h.surface.attribute(promo, "rel").as_deref(),
            Some("noopener noreferrer")
        );
        assert_eq!(
            h.surface.attribute(markup.cards[0].el, "data-href").as_deref(),
            Some("https://stepik.org/course/58852?utm_source=pp_tma")
        );

        let inner = &markup.anchors[markup.cards[1].inner_link.unwrap()];
        assert_eq!(inner.href.as_deref(), Some("/paid/rust?utm_source=pp_tma"));

        // Fragment links stay untouched
        let courses_btn = markup.courses_button.unwrap();
        assert_eq!(h.surface.attribute(courses_btn, "href"), None);
    }

    #[test]
    fn test_start_runs_once() {
        let bridge = RecordingBridge::new();
        let mut h = Harness::with_host(&bridge);
        let calls = bridge.calls().len();

        h.app.start(Rc::new(|_: HostEvent| {}));
        assert_eq!(bridge.calls().len(), calls);
    }

    #[test]
    fn test_tab_click_switches_immediately() {
        let bridge = RecordingBridge::new();
        let mut h = Harness::with_host(&bridge);
        bridge.clear_calls();

        let courses = h.tab_el("courses");
        let outcome = h.click(vec![courses]);

        assert!(!outcome.prevent_default);
        assert_eq!(h.app.active_tab(), Some("courses"));
        assert_eq!(h.active_tabs(), vec!["courses"]);
        assert_eq!(h.visible_panels(), vec!["courses"]);
        assert!(!h.surface.has_class(h.panel_el("home"), "leaving-right"));
        assert!(!h.scheduler.is_pending(TimerKey::TabSettle));

        assert_eq!(h.surface.focused(), h.markup().groups[0].toggle);
        assert_eq!(impacts(&bridge), vec![ImpactStyle::Light]);
    }

    #[test]
    fn test_activate_active_tab_is_noop() {
        let bridge = RecordingBridge::new();
        let mut h = Harness::with_host(&bridge);
        bridge.clear_calls();

        let transition = h.app.activate_tab("home", TransitionSource::Click).unwrap();
        assert_eq!(transition, Transition::Unchanged { index: 0 });
        assert!(bridge.calls().is_empty());
        assert_eq!(h.surface.focused(), None);
    }

    #[test]
    fn test_activate_unknown_tab_fails() {
        let mut h = Harness::without_host();
        let result = h.app.activate_tab("contacts", TransitionSource::Click);
        assert!(matches!(
            result,
            Err(CoreError::Tab(TabError::NotFound(ref key))) if key == "contacts"
        ));
        assert_eq!(h.app.active_tab(), Some("home"));
    }

    #[test]
    fn test_swipe_left_selects_next_tab() {
        let mut h = Harness::without_host();
        h.swipe(Point::new(300.0, 100.0), Point::new(230.0, 105.0));

        assert_eq!(h.app.active_tab(), Some("courses"));
        assert_eq!(h.visible_panels(), vec!["courses"]);
        assert!(h.surface.has_class(h.panel_el("home"), "leaving-right"));
        assert!(h.surface.has_class(h.panel_el("courses"), "entering-right"));
        assert_eq!(h.scheduler.remaining(TimerKey::TabSettle), Some(300));

        h.run_timers(300);
        assert!(!h.surface.has_class(h.panel_el("home"), "leaving-right"));
        assert!(!h.surface.has_class(h.panel_el("courses"), "entering-right"));
        assert_eq!(h.visible_panels(), vec!["courses"]);
        assert!(h.app.tabs().unwrap().pending_settle().is_none());
    }

    #[test]
    fn test_swipe_right_on_first_tab_is_clamped() {
        let mut h = Harness::without_host();
        h.swipe(Point::new(300.0, 100.0), Point::new(370.0, 100.0));

        assert_eq!(h.app.active_tab(), Some("home"));
        assert!(h.scheduler.pending().is_empty());

        h.app.activate_tab("about", TransitionSource::Click).unwrap();
        h.swipe(Point::new(300.0, 100.0), Point::new(370.0, 100.0));
        assert_eq!(h.app.active_tab(), Some("courses"));
        assert!(h.surface.has_class(h.panel_el("courses"), "entering-left"));
        assert!(h.surface.has_class(h.panel_el("about"), "leaving-left"));
    }

    #[test]
    fn test_vertical_gesture_never_switches() {
        let mut h = Harness::without_host();
        h.swipe(Point::new(300.0, 100.0), Point::new(230.0, 150.0));
        assert_eq!(h.app.active_tab(), Some("home"));

        let outcome = h.app.handle(UiEvent::TouchStart {
            touches: vec![Point::new(300.0, 100.0)],
        });
        assert!(!outcome.prevent_default);
        let outcome = h.app.handle(UiEvent::TouchMove {
            touches: vec![Point::new(280.0, 102.0)],
        });
        assert!(outcome.prevent_default);
    }

    #[test]
    fn test_second_swipe_completes_pending_settle() {
        let mut h = Harness::without_host();
        h.swipe(Point::new(300.0, 100.0), Point::new(230.0, 100.0));
        h.run_timers(100);
        h.swipe(Point::new(300.0, 100.0), Point::new(230.0, 100.0));

        assert_eq!(h.app.active_tab(), Some("about"));
        assert!(!h.surface.has_class(h.panel_el("home"), "leaving-right"));
        assert!(h.surface.has_class(h.panel_el("courses"), "leaving-right"));
        assert!(h.surface.has_class(h.panel_el("about"), "entering-right"));
        assert_eq!(h.scheduler.remaining(TimerKey::TabSettle), Some(300));
    }

    #[test]
    fn test_mouse_drag_switches_tab() {
        let mut h = Harness::without_host();
        let home = h.markup().panels[0].el;

        h.app.handle(UiEvent::MouseDown {
            x: 300.0,
            path: vec![home],
        });
        h.app.handle(UiEvent::MouseUp { x: 200.0 });
        assert_eq!(h.app.active_tab(), Some("courses"));

        let courses = h.markup().panels[1].el;
        h.app.handle(UiEvent::MouseDown {
            x: 300.0,
            path: vec![courses],
        });
        h.app.handle(UiEvent::MouseUp { x: 280.0 });
        assert_eq!(h.app.active_tab(), Some("courses"));
    }

    #[test]
    fn test_mouse_drag_outside_panels_is_ignored() {
        let mut h = Harness::without_host();
        let tab = h.tab_el("courses");

        h.app.handle(UiEvent::MouseDown {
            x: 300.0,
            path: vec![tab],
        });
        h.app.handle(UiEvent::MouseUp { x: 100.0 });
        assert_eq!(h.app.active_tab(), Some("home"));

        h.app.handle(UiEvent::MouseDown {
            x: 300.0,
            path: Vec::new(),
        });
        h.app.handle(UiEvent::MouseUp { x: 100.0 });
        assert_eq!(h.app.active_tab(), Some("home"));
    }

    #[test]
    fn test_card_click_opens_destination() {
        let mut h = Harness::without_host();
        let cards: Vec<ElementId> = h.markup().cards.iter().map(|c| c.el).collect();

        h.click(vec![cards[0]]);
        h.click(vec![cards[1]]);
        h.click(vec![cards[2]]);

        assert_eq!(
            h.surface.opened(),
            vec![
                (
                    "https://stepik.org/course/58852?utm_source=pp_tma".to_string(),
                    "_self".to_string()
                ),
                ("/paid/rust?utm_source=pp_tma".to_string(), "_blank".to_string()),
            ]
        );
    }

    #[test]
    fn test_nested_link_click_does_not_navigate_card() {
        let mut h = Harness::without_host();
        let card = h.markup().cards[0].clone();
        let path = vec![h.markup().hover_links[0], card.links_area.unwrap(), card.el];

        h.click(path);
        assert!(h.surface.opened().is_empty());
    }

    #[test]
    fn test_blocked_open_navigates_in_place() {
        let surface = MemorySurface::new().with_location(LOCATION).blocking_open();
        let services = Services {
            host: Host::absent(),
            surface: Box::new(surface.clone()),
            scheduler: Box::new(ManualScheduler::new()),
            store: Box::new(MemoryStore::new()),
        };
        let mut app = App::new(Config::default(), scan_html(PAGE), services);
        app.start(Rc::new(|_: HostEvent| {}));

        let card = app.markup().cards[0].el;
        app.handle(UiEvent::Click { path: vec![card] });
        assert_eq!(
            surface.navigated(),
            vec!["https://stepik.org/course/58852?utm_source=pp_tma".to_string()]
        );
    }

    #[test]
    fn test_card_keyboard_activation() {
        let mut h = Harness::without_host();
        let card = h.markup().cards[0].el;
        let link = h.markup().hover_links[0];

        let outcome = h.app.handle(UiEvent::KeyDown {
            target: Some(card),
            key: Key::Enter,
        });
        assert!(outcome.prevent_default);
        assert_eq!(h.surface.opened().len(), 1);

        let outcome = h.app.handle(UiEvent::KeyDown {
            target: Some(link),
            key: Key::Space,
        });
        assert!(!outcome.prevent_default);

        let outcome = h.app.handle(UiEvent::KeyDown {
            target: Some(card),
            key: Key::Other,
        });
        assert!(!outcome.prevent_default);
        assert_eq!(h.surface.opened().len(), 1);
    }

    #[test]
    fn test_group_toggle_flips_both_ways() {
        let bridge = RecordingBridge::new();
        let mut h = Harness::with_host(&bridge);
        bridge.clear_calls();

        let group = h.markup().groups[0].clone();
        let toggle = group.toggle.unwrap();

        assert!(h.click(vec![toggle]).prevent_default);
        assert!(!h.surface.has_class(group.el, "collapsed"));
        assert_eq!(h.surface.attribute(toggle, "aria-expanded").as_deref(), Some("true"));

        let outcome = h.app.handle(UiEvent::KeyDown {
            target: Some(toggle),
            key: Key::Space,
        });
        assert!(outcome.prevent_default);
        assert!(h.surface.has_class(group.el, "collapsed"));
        assert_eq!(h.surface.attribute(toggle, "aria-expanded").as_deref(), Some("false"));

        assert_eq!(impacts(&bridge), vec![ImpactStyle::Light, ImpactStyle::Light]);
    }

    #[test]
    fn test_toggle_unknown_group() {
        let mut h = Harness::without_host();
        assert!(matches!(
            h.app.toggle_group(4),
            Err(CoreError::Catalog(CatalogError::GroupNotFound(4)))
        ));
    }

    #[test]
    fn test_link_hover_grace_period() {
        let mut h = Harness::without_host();
        let link = h.markup().hover_links[0];
        let key = TimerKey::LinkLeave(0);

        h.app.handle(UiEvent::LinkHover {
            link: 0,
            input: HoverInput::PointerEnter,
        });
        assert!(h.surface.has_class(link, "is-hovered"));

        h.app.handle(UiEvent::LinkHover {
            link: 0,
            input: HoverInput::PointerLeave,
        });
        assert!(!h.surface.has_class(link, "is-hovered"));
        assert!(h.surface.has_class(link, "is-leaving"));
        assert_eq!(h.scheduler.remaining(key), Some(260));

        // Coming back cancels the pending removal
        h.app.handle(UiEvent::LinkHover {
            link: 0,
            input: HoverInput::Focus,
        });
        assert!(!h.surface.has_class(link, "is-leaving"));
        assert!(!h.scheduler.is_pending(key));

        h.app.handle(UiEvent::LinkHover {
            link: 0,
            input: HoverInput::Blur,
        });
        h.run_timers(259);
        assert!(h.surface.has_class(link, "is-leaving"));
        h.run_timers(1);
        assert!(!h.surface.has_class(link, "is-leaving"));
    }

    #[test]
    fn test_banner_dismiss_persisted() {
        let config = Config {
            persist_alert_dismiss: true,
            ..Config::default()
        };
        let mut h = Harness::new(config, None, MemoryStore::new());
        let banner = h.markup().banner.clone().unwrap();

        let outcome = h.click(vec![banner.close.unwrap(), banner.el]);
        assert!(outcome.prevent_default);
        assert!(h.surface.has_class(banner.el, "hidden"));
        assert_eq!(h.store.value("stepik_alert_hidden").as_deref(), Some("1"));
    }

    #[test]
    fn test_banner_dismiss_not_persisted_by_default() {
        let mut h = Harness::without_host();
        let banner = h.markup().banner.clone().unwrap();

        h.app.dismiss_banner().unwrap();
        assert!(h.surface.has_class(banner.el, "hidden"));
        assert!(h.app.banner().unwrap().is_hidden());
        assert_eq!(h.store.value("stepik_alert_hidden"), None);
    }

    #[test]
    fn test_banner_restored_from_session() {
        let config = Config {
            persist_alert_dismiss: true,
            ..Config::default()
        };
        let store = MemoryStore::new().with_entry("stepik_alert_hidden", "1");
        let h = Harness::new(config, None, store.clone());
        let banner = h.markup().banner.clone().unwrap();
        assert!(h.surface.has_class(banner.el, "hidden"));

        // Stored flag is ignored without persistence
        let h = Harness::new(Config::default(), None, store);
        assert!(!h.surface.has_class(banner.el, "hidden"));
    }

    #[test]
    fn test_banner_survives_failing_storage() {
        let config = Config {
            persist_alert_dismiss: true,
            ..Config::default()
        };
        let mut h = Harness::new(config, None, MemoryStore::new().failing());
        let banner = h.markup().banner.clone().unwrap();

        assert!(!h.surface.has_class(banner.el, "hidden"));
        assert!(h.app.dismiss_banner().is_ok());
        assert!(h.surface.has_class(banner.el, "hidden"));
    }

    #[test]
    fn test_courses_button() {
        let bridge = RecordingBridge::new();
        let mut h = Harness::with_host(&bridge);
        bridge.clear_calls();

        let button = h.markup().courses_button.unwrap();
        let home = h.panel_el("home");
        let outcome = h.click(vec![button, home]);

        assert!(outcome.prevent_default);
        assert_eq!(h.app.active_tab(), Some("courses"));
        assert_eq!(impacts(&bridge), vec![ImpactStyle::Light, ImpactStyle::Medium]);
    }

    #[test]
    fn test_certificate_button_needs_host() {
        let bridge = RecordingBridge::new();
        let mut h = Harness::with_host(&bridge);
        let button = h.markup().certificate_button.unwrap();

        let outcome = h.click(vec![button]);
        assert!(outcome.prevent_default);
        assert_eq!(sent_actions(&bridge), vec!["get_certificate"]);
        assert!(impacts(&bridge).contains(&ImpactStyle::Medium));

        let mut h = Harness::without_host();
        let outcome = h.click(vec![button]);
        assert!(!outcome.prevent_default);
    }

    #[test]
    fn test_host_startup_and_theme() {
        let theme = ThemeParams {
            bg_color: Some("#17212b".to_string()),
            button_color: Some("#5288c1".to_string()),
            ..ThemeParams::default()
        };
        let bridge = RecordingBridge::new().with_theme(theme);
        let mut h = Harness::with_host(&bridge);

        assert!(h.app.host_ready());
        let calls = bridge.calls();
        assert_eq!(calls[0], BridgeCall::Ready);
        assert_eq!(calls[1], BridgeCall::Expand);
        assert!(calls.contains(&BridgeCall::Subscribe(HostEvent::ThemeChanged)));
        assert!(calls.contains(&BridgeCall::Subscribe(HostEvent::MainButtonClicked)));
        assert_eq!(h.surface.root_var("--app-bg-color").as_deref(), Some("#17212b"));
        assert_eq!(h.surface.root_var("--button-bg").as_deref(), Some("#5288c1"));

        bridge.set_theme(ThemeParams {
            bg_color: Some("#ffffff".to_string()),
            ..ThemeParams::default()
        });
        assert_eq!(bridge.emit(HostEvent::ThemeChanged), 1);

        let events: Vec<HostEvent> = h.host_events.borrow_mut().drain(..).collect();
        assert_eq!(events, vec![HostEvent::ThemeChanged]);
        for event in events {
            h.app.handle(UiEvent::Host(event));
        }
        assert_eq!(h.surface.root_var("--app-bg-color").as_deref(), Some("#ffffff"));
    }

    #[test]
    fn test_main_button_click_relayed() {
        let bridge = RecordingBridge::new();
        let mut h = Harness::with_host(&bridge);

        bridge.emit(HostEvent::MainButtonClicked);
        let events: Vec<HostEvent> = h.host_events.borrow_mut().drain(..).collect();
        for event in events {
            h.app.handle(UiEvent::Host(event));
        }
        assert_eq!(sent_actions(&bridge), vec!["main_button_clicked"]);
    }

    #[test]
    fn test_main_button_follows_tab() {
        let mut config = Config::default();
        config.main_button.enabled = true;

        let bridge = RecordingBridge::new();
        let mut h = Harness::new(config, Some(bridge.clone()), MemoryStore::new());

        let buttons: Vec<MainButtonCommand> = bridge
            .calls()
            .into_iter()
            .filter_map(|call| match call {
                BridgeCall::MainButton(command) => Some(command),
                _ => None,
            })
            .collect();
        assert_eq!(
            buttons,
            vec![
                MainButtonCommand::SetText("Записаться".to_string()),
                MainButtonCommand::Enable,
                MainButtonCommand::Hide,
            ]
        );

        bridge.clear_calls();
        h.app.activate_tab("courses", TransitionSource::Click).unwrap();
        assert!(bridge
            .calls()
            .contains(&BridgeCall::MainButton(MainButtonCommand::Show)));
    }

    #[test]
    fn test_main_button_disabled_by_default() {
        let bridge = RecordingBridge::new();
        let _h = Harness::with_host(&bridge);
        assert!(!bridge
            .calls()
            .iter()
            .any(|call| matches!(call, BridgeCall::MainButton(_))));
    }

    #[test]
    fn test_failing_host_never_breaks_the_page() {
        let bridge = RecordingBridge::new().failing();
        let mut h = Harness::with_host(&bridge);

        assert!(h.app.host_ready());
        assert_eq!(h.app.active_tab(), Some("home"));

        h.app.haptic(HapticStyle::Heavy);
        h.app.haptic(HapticStyle::Selection);
        let courses = h.tab_el("courses");
        h.click(vec![courses]);
        assert_eq!(h.app.active_tab(), Some("courses"));
        assert!(!h.app.send_to_bot("ping"));
    }

    #[test]
    fn test_refused_ready_keeps_host_startup() {
        let theme = ThemeParams {
            bg_color: Some("#111111".to_string()),
            ..ThemeParams::default()
        };
        let bridge = RecordingBridge::new().with_theme(theme).failing_on("ready");
        let mut h = Harness::with_host(&bridge);

        assert!(h.app.host_ready());
        assert_eq!(h.surface.root_var("--app-bg-color").as_deref(), Some("#111111"));

        let calls = bridge.calls();
        assert!(calls.contains(&BridgeCall::Expand));
        assert!(calls.contains(&BridgeCall::Subscribe(HostEvent::ThemeChanged)));
        assert!(calls.contains(&BridgeCall::Subscribe(HostEvent::MainButtonClicked)));

        let button = h.markup().certificate_button.unwrap();
        assert!(h.click(vec![button]).prevent_default);
        assert_eq!(sent_actions(&bridge), vec!["get_certificate"]);
    }

    #[test]
    fn test_without_host() {
        let mut h = Harness::without_host();
        assert!(!h.app.host_ready());
        assert!(!h.app.send_to_bot("ping"));
        h.app.haptic(HapticStyle::Light);
        assert_eq!(h.surface.root_var("--app-bg-color"), None);
        assert!(h.host_events.borrow().is_empty());
    }

    #[test]
    fn test_resize_is_debounced() {
        let mut h = Harness::without_host();
        h.app.handle(UiEvent::Resize);
        h.run_timers(200);
        h.app.handle(UiEvent::Resize);

        assert_eq!(h.scheduler.scheduled_count(), 2);
        assert!(h.scheduler.advance(249).is_empty());
        assert_eq!(h.scheduler.advance(1), vec![TimerKey::Resize]);

        h.surface.set_metrics(Metrics {
            viewport_width: 280.0,
            container_width: Some(260.0),
            stylesheets: 1,
        });
        let report = h.app.run_diagnostics();
        assert_eq!(report.cards, 3);
        assert_eq!(report.two_columns, Some(false));
    }

    #[test]
    fn test_swipe_direction_neighbors() {
        let h = Harness::without_host();
        let tabs = h.app.tabs().unwrap();
        assert_eq!(tabs.neighbor(SwipeDirection::Next), Some("courses"));
        assert_eq!(tabs.neighbor(SwipeDirection::Previous), None);
    }
}
