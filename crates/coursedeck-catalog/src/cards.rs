//! Course cards
//!
//! A card is clickable as a whole unless the click lands on one of its own
//! controls. Cards whose action links offer enrollment are marked free.

use coursedeck_links::LinkTarget;

use crate::error::CatalogError;
use crate::markup::{ElementId, PageMarkup, Role};
use crate::Result;

/// Default enrollment keywords ("sign up" and its forms)
const ENROLL_KEYWORDS: &[&str] = &["записать", "записаться", "записан"];

/// Case-insensitive keyword match on link texts
#[derive(Debug, Clone)]
pub struct EnrollMatcher {
    keywords: Vec<String>,
}

impl EnrollMatcher {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    pub fn matches(&self, text: &str) -> bool {
        let text = text.trim().to_lowercase();
        self.keywords.iter().any(|k| text.contains(k.as_str()))
    }
}

impl Default for EnrollMatcher {
    fn default() -> Self {
        Self::new(ENROLL_KEYWORDS)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub el: ElementId,
    /// Explicit `data-href`, else the inner card link's `href`
    pub destination: Option<String>,
    pub target: LinkTarget,
    pub free: bool,
    /// Card has no `tabindex` of its own
    pub needs_tabindex: bool,
}

impl Card {
    /// Destination worth navigating to; empty and `#` are placeholders
    pub fn navigable_destination(&self) -> Option<&str> {
        self.destination
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty() && *d != "#")
    }
}

/// Outcome of a click that reached the card layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardClick {
    /// Click was not inside a card
    Outside,
    /// Click landed on a control nested in the card
    Nested { card: usize },
    /// Card has no real destination
    NoDestination { card: usize },
    Navigate {
        card: usize,
        url: String,
        target: LinkTarget,
    },
}

#[derive(Debug, Clone, Default)]
pub struct CardSet {
    cards: Vec<Card>,
}

impl CardSet {
    pub fn from_markup(markup: &PageMarkup, matcher: &EnrollMatcher) -> Self {
        let cards = markup
            .cards
            .iter()
            .map(|card| {
                let inner = card.inner_link.and_then(|i| markup.anchors.get(i));

                let destination = markup
                    .card_data_href(card)
                    .filter(|h| !h.trim().is_empty())
                    .map(str::to_string)
                    .or_else(|| inner.and_then(|a| a.href.clone()));

                let target = match card.data_target.as_deref() {
                    Some(t) => LinkTarget::parse(Some(t)),
                    None => inner.map(|a| a.link_target()).unwrap_or_default(),
                };

                let free = card.link_texts.iter().any(|t| matcher.matches(t));

                Card {
                    el: card.el,
                    destination,
                    target,
                    free,
                    needs_tabindex: !card.has_tabindex,
                }
            })
            .collect::<Vec<_>>();

        let free = cards.iter().filter(|c| c.free).count();
        tracing::debug!(cards = cards.len(), free, "Classified course cards");

        Self { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&Card> {
        self.cards
            .get(index)
            .ok_or(CatalogError::CardNotFound(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    pub fn free_cards(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter().filter(|c| c.free)
    }

    /// Resolve a click from the roles of the registered elements on the
    /// event path, innermost first.
    pub fn resolve_click<'a, I>(&self, path: I) -> CardClick
    where
        I: IntoIterator<Item = &'a [Role]>,
    {
        let mut nested = false;

        for roles in path {
            if let Some(card) = roles.iter().find_map(|r| match r {
                Role::Card(i) => Some(*i),
                _ => None,
            }) {
                if nested {
                    return CardClick::Nested { card };
                }
                return self.navigate(card);
            }

            if roles.iter().any(Role::is_nested_action) {
                nested = true;
            }
        }

        CardClick::Outside
    }

    /// Keyboard activation of the card itself
    pub fn navigate(&self, card: usize) -> CardClick {
        let Some(entry) = self.cards.get(card) else {
            return CardClick::Outside;
        };

        match entry.navigable_destination() {
            Some(url) => CardClick::Navigate {
                card,
                url: url.to_string(),
                target: entry.target.clone(),
            },
            None => CardClick::NoDestination { card },
        }
    }
}
