//! Link error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LinkError {
    #[error("Invalid tracking parameter: {0}")]
    InvalidParam(String),

    #[error("Invalid base URL: {0}")]
    InvalidBase(#[from] url::ParseError),
}
