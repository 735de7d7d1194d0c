//! Coursedeck Link Handling
//!
//! Outbound links carry a campaign parameter so the catalog can attribute
//! traffic coming from the mini app:
//! - every `href` and `data-href` is tagged once at startup
//! - fragments, `mailto:` and `javascript:` links are left alone
//! - links opening a new browsing context get `rel="noopener noreferrer"`

mod error;
mod tagging;
mod target;

pub use error::LinkError;
pub use tagging::UtmTagger;
pub use target::{with_noopener, LinkTarget};

pub type Result<T> = std::result::Result<T, LinkError>;
