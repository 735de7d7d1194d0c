//! Markup scan over parsed HTML, used for server-rendered pages and tests

use scraper::{ElementRef, Html};

use crate::markup::{scan, MarkupNode, PageMarkup, Scan};

impl MarkupNode for ElementRef<'_> {
    fn tag_name(&self) -> String {
        self.value().name().to_ascii_lowercase()
    }

    fn attr(&self, name: &str) -> Option<String> {
        self.value().attr(name).map(str::to_string)
    }

    fn has_class(&self, class: &str) -> bool {
        self.value().classes().any(|c| c == class)
    }

    fn text(&self) -> String {
        ElementRef::text(self).collect()
    }

    fn children(&self) -> Vec<Self> {
        (**self).children().filter_map(ElementRef::wrap).collect()
    }
}

pub struct HtmlDocument {
    html: Html,
}

impl HtmlDocument {
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
        }
    }

    pub fn scan(&self) -> Scan<ElementRef<'_>> {
        scan(&self.html.root_element())
    }
}

/// Scan an HTML document and keep only the markup model
pub fn scan_html(source: &str) -> PageMarkup {
    HtmlDocument::parse(source).scan().markup
}
