//! Bridge error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Host bridge unavailable")]
    Unavailable,

    #[error("Host capability not supported: {0}")]
    Unsupported(&'static str),

    #[error("Host call {method} failed: {message}")]
    Call {
        method: &'static str,
        message: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BridgeError {
    pub fn call(method: &'static str, message: impl Into<String>) -> Self {
        BridgeError::Call {
            method,
            message: message.into(),
        }
    }
}
