//! Tab error types

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TabError {
    #[error("Tab not found: {0}")]
    NotFound(String),

    #[error("Tab {0} has no content panel")]
    MissingPanel(String),

    #[error("Page has no tabs")]
    Empty,
}
