//! Catalog error types

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Course group not found: {0}")]
    GroupNotFound(usize),

    #[error("Course card not found: {0}")]
    CardNotFound(usize),

    #[error("Page has no info banner")]
    NoBanner,
}
