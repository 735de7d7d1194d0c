//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Tab error: {0}")]
    Tab(#[from] coursedeck_tabs::TabError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] coursedeck_catalog::CatalogError),

    #[error("Bridge error: {0}")]
    Bridge(#[from] coursedeck_bridge::BridgeError),

    #[error("Link error: {0}")]
    Link(#[from] coursedeck_links::LinkError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Session storage error: {0}")]
    Storage(String),

    #[error("Could not open {url}: {message}")]
    Open { url: String, message: String },
}
