//! Coursedeck Catalog
//!
//! Everything the page markup contributes:
//! - a single scan that assigns every interactive element an `ElementId`
//!   and records what role it plays
//! - course cards (navigation targets, free classification)
//! - collapsible course groups
//! - hover states of the small action links
//! - the dismissible info banner

mod banner;
mod cards;
mod error;
mod groups;
mod hover;
mod html;
mod markup;

pub use banner::{InfoBanner, DISMISSED_FLAG, HIDDEN_CLASS};
pub use cards::{Card, CardClick, CardSet, EnrollMatcher};
pub use error::CatalogError;
pub use groups::{Group, GroupSet, GroupToggle};
pub use hover::{HoverInput, LeaveTimer, LinkHover, LinkVisual, HOVERED_CLASS, LEAVING_CLASS};
pub use html::{scan_html, HtmlDocument};
pub use markup::{
    scan, AnchorMarkup, AttributeWrite, BannerMarkup, CardMarkup, DataHrefMarkup, ElementId,
    GroupMarkup, MarkupNode, PageMarkup, PanelMarkup, Role, Scan, TabMarkup,
};

pub type Result<T> = std::result::Result<T, CatalogError>;
