//! Page markup scan
//!
//! The page is walked once at startup. Every element the app will read or
//! write gets a dense `ElementId`; the `roles` table maps each id to what the
//! element is for. Event dispatch looks roles up by id instead of matching
//! selectors against the event target.

use coursedeck_links::{with_noopener, LinkTarget, UtmTagger};
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub u32);

impl ElementId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "el{}", self.0)
    }
}

/// Read-only view of a markup element, implemented for parsed HTML and for
/// the live DOM.
pub trait MarkupNode: Clone {
    /// Lowercase tag name
    fn tag_name(&self) -> String;
    fn attr(&self, name: &str) -> Option<String>;
    fn has_class(&self, class: &str) -> bool;
    /// Concatenated text content
    fn text(&self) -> String;
    fn children(&self) -> Vec<Self>;
}

/// What an element is for. One element can play several roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Tab(usize),
    Panel(usize),
    /// First focusable descendant of a panel
    Focusable(usize),
    Group(usize),
    GroupToggle(usize),
    Card(usize),
    /// Enrollment/action links area inside a card
    CardLinks,
    Anchor(usize),
    Button,
    /// Small action link with hover animation
    HoverLink(usize),
    DataHref(usize),
    Banner,
    BannerClose,
    CoursesButton,
    CertificateButton,
    Container,
}

impl Role {
    /// Clicks on these never navigate the enclosing card
    pub fn is_nested_action(&self) -> bool {
        matches!(
            self,
            Role::CardLinks | Role::Anchor(_) | Role::Button | Role::HoverLink(_)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabMarkup {
    pub el: ElementId,
    /// `data-tab`, the id of the panel it shows
    pub key: String,
    /// Tab carried the `active` class in the served markup
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelMarkup {
    pub el: ElementId,
    pub key: String,
    pub first_focusable: Option<ElementId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupMarkup {
    pub el: ElementId,
    pub toggle: Option<ElementId>,
    pub collapsed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardMarkup {
    pub el: ElementId,
    /// Index into `PageMarkup::data_hrefs`
    pub data_href: Option<usize>,
    pub data_target: Option<String>,
    pub has_tabindex: bool,
    /// Index into `PageMarkup::anchors` of the `.course-card-link`
    pub inner_link: Option<usize>,
    pub links_area: Option<ElementId>,
    /// Trimmed texts of the anchors in the links area
    pub link_texts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorMarkup {
    pub el: ElementId,
    pub href: Option<String>,
    pub target: Option<String>,
    pub rel: Option<String>,
    /// Carries the `.course-link` class
    pub course_link: bool,
}

impl AnchorMarkup {
    pub fn link_target(&self) -> LinkTarget {
        LinkTarget::parse(self.target.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataHrefMarkup {
    pub el: ElementId,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BannerMarkup {
    pub el: ElementId,
    pub close: Option<ElementId>,
}

/// Attribute the startup pass rewrote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeWrite {
    pub el: ElementId,
    pub name: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, Default)]
pub struct PageMarkup {
    roles: Vec<Vec<Role>>,
    pub tabs: Vec<TabMarkup>,
    pub panels: Vec<PanelMarkup>,
    pub groups: Vec<GroupMarkup>,
    pub cards: Vec<CardMarkup>,
    pub anchors: Vec<AnchorMarkup>,
    pub data_hrefs: Vec<DataHrefMarkup>,
    pub hover_links: Vec<ElementId>,
    pub buttons: Vec<ElementId>,
    pub banner: Option<BannerMarkup>,
    pub courses_button: Option<ElementId>,
    pub certificate_button: Option<ElementId>,
    pub container: Option<ElementId>,
}

impl PageMarkup {
    pub fn element_count(&self) -> usize {
        self.roles.len()
    }

    pub fn roles(&self, el: ElementId) -> &[Role] {
        self.roles.get(el.index()).map(Vec::as_slice).unwrap_or(&[])
    }

    #[cfg(test)]
    pub(crate) fn has_role(&self, el: ElementId, role: Role) -> bool {
        self.roles(el).contains(&role)
    }

    pub fn panel(&self, key: &str) -> Option<&PanelMarkup> {
        self.panels.iter().find(|p| p.key == key)
    }

    pub fn tab(&self, key: &str) -> Option<&TabMarkup> {
        self.tabs.iter().find(|t| t.key == key)
    }

    /// Key of the tab marked active in the served markup
    pub fn initial_tab(&self) -> Option<&str> {
        self.tabs.iter().find(|t| t.active).map(|t| t.key.as_str())
    }

    pub fn card_data_href(&self, card: &CardMarkup) -> Option<&str> {
        card.data_href
            .and_then(|i| self.data_hrefs.get(i))
            .map(|d| d.value.as_str())
    }

    /// Tag every `href` and `data-href` and annotate new-context links.
    ///
    /// The markup is updated in place; the returned writes must be applied
    /// to the rendered page.
    pub fn tag_links(&mut self, tagger: &UtmTagger, base: Option<&Url>) -> Vec<AttributeWrite> {
        let mut writes = Vec::new();

        for anchor in &mut self.anchors {
            if let Some(href) = anchor.href.as_mut() {
                let tagged = tagger.tag(href, base);
                if tagged != *href {
                    *href = tagged.clone();
                    writes.push(AttributeWrite {
                        el: anchor.el,
                        name: "href",
                        value: tagged,
                    });
                }
            }

            if anchor.link_target().opens_new_context() {
                if let Some(rel) = with_noopener(anchor.rel.as_deref()) {
                    anchor.rel = Some(rel.clone());
                    writes.push(AttributeWrite {
                        el: anchor.el,
                        name: "rel",
                        value: rel,
                    });
                }
            }
        }

        for entry in &mut self.data_hrefs {
            let tagged = tagger.tag(&entry.value, base);
            if tagged != entry.value {
                entry.value = tagged.clone();
                writes.push(AttributeWrite {
                    el: entry.el,
                    name: "data-href",
                    value: tagged,
                });
            }
        }

        tracing::debug!(rewritten = writes.len(), "Tagged outbound links");
        writes
    }
}

/// Result of a scan: the markup model plus the scanned nodes, indexed by
/// `ElementId`.
pub struct Scan<N> {
    pub markup: PageMarkup,
    pub nodes: Vec<N>,
}

#[derive(Debug, Clone, Copy, Default)]
struct Context {
    panel: Option<usize>,
    group: Option<usize>,
    card: Option<usize>,
    in_card_links: bool,
}

struct Scanner<N> {
    markup: PageMarkup,
    nodes: Vec<N>,
    banner: Option<ElementId>,
    banner_close: Option<ElementId>,
}

/// Walk the tree under `root` (inclusive) in document order
pub fn scan<N: MarkupNode>(root: &N) -> Scan<N> {
    let mut scanner = Scanner {
        markup: PageMarkup::default(),
        nodes: Vec::new(),
        banner: None,
        banner_close: None,
    };
    scanner.visit(root, Context::default());

    let mut markup = scanner.markup;
    markup.banner = scanner.banner.map(|el| BannerMarkup {
        el,
        close: scanner.banner_close,
    });

    tracing::debug!(
        elements = markup.element_count(),
        tabs = markup.tabs.len(),
        cards = markup.cards.len(),
        groups = markup.groups.len(),
        "Scanned page markup"
    );

    Scan {
        markup,
        nodes: scanner.nodes,
    }
}

fn is_focusable<N: MarkupNode>(node: &N, tag: &str) -> bool {
    tag == "a"
        || tag == "button"
        || node
            .attr("tabindex")
            .map(|v| v.trim() != "-1")
            .unwrap_or(false)
}

impl<N: MarkupNode> Scanner<N> {
    fn register(&mut self, node: &N, roles: Vec<Role>) -> ElementId {
        let el = ElementId(self.nodes.len() as u32);
        self.nodes.push(node.clone());
        self.markup.roles.push(roles);
        el
    }

    fn visit(&mut self, node: &N, parent: Context) {
        let mut ctx = parent;
        let tag = node.tag_name();
        let id_attr = node.attr("id");
        let mut roles = Vec::new();

        let tab_key = if node.has_class("tab") {
            node.attr("data-tab").filter(|k| !k.is_empty())
        } else {
            None
        };
        if tab_key.is_some() {
            roles.push(Role::Tab(self.markup.tabs.len()));
        }

        let panel_key = if node.has_class("tab-content") {
            id_attr.clone().filter(|k| !k.is_empty())
        } else {
            None
        };
        if panel_key.is_some() {
            roles.push(Role::Panel(self.markup.panels.len()));
        }

        let focus_panel = parent
            .panel
            .filter(|&p| self.markup.panels[p].first_focusable.is_none())
            .filter(|_| is_focusable(node, &tag));
        if let Some(p) = focus_panel {
            roles.push(Role::Focusable(p));
        }

        let is_group = node.has_class("course-group");
        if is_group {
            roles.push(Role::Group(self.markup.groups.len()));
        }

        let toggle_group = parent
            .group
            .filter(|&g| self.markup.groups[g].toggle.is_none())
            .filter(|_| node.has_class("group-toggle"));
        if let Some(g) = toggle_group {
            roles.push(Role::GroupToggle(g));
        }

        let is_card = node.has_class("course-card");
        if is_card {
            roles.push(Role::Card(self.markup.cards.len()));
        }

        let is_links_area = node.has_class("course-links");
        if is_links_area {
            roles.push(Role::CardLinks);
        }

        let is_anchor = tag == "a";
        if is_anchor {
            roles.push(Role::Anchor(self.markup.anchors.len()));
        }

        let is_hover_link = node.has_class("course-link");
        if is_hover_link {
            roles.push(Role::HoverLink(self.markup.hover_links.len()));
        }

        let is_button = tag == "button";
        if is_button {
            roles.push(Role::Button);
        }

        let data_href = node.attr("data-href");
        if data_href.is_some() {
            roles.push(Role::DataHref(self.markup.data_hrefs.len()));
        }

        let id_role = match id_attr.as_deref() {
            Some("stepik-alert") if self.banner.is_none() => Some(Role::Banner),
            Some("stepik-alert-close") if self.banner_close.is_none() => Some(Role::BannerClose),
            Some("courses-btn") if self.markup.courses_button.is_none() => {
                Some(Role::CoursesButton)
            }
            Some("certificate-btn") if self.markup.certificate_button.is_none() => {
                Some(Role::CertificateButton)
            }
            _ => None,
        };
        roles.extend(id_role);

        let is_container = node.has_class("container") && self.markup.container.is_none();
        if is_container {
            roles.push(Role::Container);
        }

        if !roles.is_empty() {
            let el = self.register(node, roles);
            let markup = &mut self.markup;

            if let Some(key) = tab_key {
                markup.tabs.push(TabMarkup {
                    el,
                    key,
                    active: node.has_class("active"),
                });
            }

            if let Some(key) = panel_key {
                ctx.panel = Some(markup.panels.len());
                markup.panels.push(PanelMarkup {
                    el,
                    key,
                    first_focusable: None,
                });
            }

            if let Some(p) = focus_panel {
                markup.panels[p].first_focusable = Some(el);
            }

            if is_group {
                ctx.group = Some(markup.groups.len());
                markup.groups.push(GroupMarkup {
                    el,
                    toggle: None,
                    collapsed: node.has_class("collapsed"),
                });
            }

            if let Some(g) = toggle_group {
                markup.groups[g].toggle = Some(el);
            }

            let data_href_index = data_href.map(|value| {
                markup.data_hrefs.push(DataHrefMarkup { el, value });
                markup.data_hrefs.len() - 1
            });

            if is_card {
                ctx.card = Some(markup.cards.len());
                ctx.in_card_links = false;
                markup.cards.push(CardMarkup {
                    el,
                    data_href: data_href_index,
                    data_target: node.attr("data-target").filter(|t| !t.is_empty()),
                    has_tabindex: node.attr("tabindex").is_some(),
                    inner_link: None,
                    links_area: None,
                    link_texts: Vec::new(),
                });
            }

            if is_links_area {
                if let Some(c) = ctx.card {
                    markup.cards[c].links_area.get_or_insert(el);
                }
                ctx.in_card_links = true;
            }

            if is_anchor {
                let index = markup.anchors.len();
                markup.anchors.push(AnchorMarkup {
                    el,
                    href: node.attr("href"),
                    target: node.attr("target"),
                    rel: node.attr("rel"),
                    course_link: is_hover_link,
                });

                if let Some(c) = ctx.card {
                    let card = &mut markup.cards[c];
                    if ctx.in_card_links {
                        card.link_texts.push(node.text().trim().to_string());
                    }
                    if node.has_class("course-card-link") && card.inner_link.is_none() {
                        card.inner_link = Some(index);
                    }
                }
            }

            if is_hover_link {
                markup.hover_links.push(el);
            }

            if is_button {
                markup.buttons.push(el);
            }

            match id_role {
                Some(Role::Banner) => self.banner = Some(el),
                Some(Role::BannerClose) => self.banner_close = Some(el),
                Some(Role::CoursesButton) => self.markup.courses_button = Some(el),
                Some(Role::CertificateButton) => self.markup.certificate_button = Some(el),
                _ => {}
            }

            if is_container {
                self.markup.container = Some(el);
            }
        }

        for child in node.children() {
            self.visit(&child, ctx);
        }
    }
}
