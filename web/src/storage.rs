//! `sessionStorage` access

use coursedeck_core::{CoreError, Result, SessionStore};
use web_sys::Storage;

use crate::dom::js_message;

/// Session store over `window.sessionStorage`. Browsers that block storage
/// yield `None` here and every access fails.
pub struct BrowserSessionStore {
    storage: Option<Storage>,
}

impl BrowserSessionStore {
    pub fn new() -> Self {
        let storage = web_sys::window().and_then(|window| window.session_storage().ok().flatten());
        if storage.is_none() {
            tracing::debug!("sessionStorage unavailable");
        }
        Self { storage }
    }

    fn storage(&self) -> Result<&Storage> {
        self.storage
            .as_ref()
            .ok_or_else(|| CoreError::Storage("sessionStorage unavailable".to_string()))
    }
}

impl SessionStore for BrowserSessionStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.storage()?
            .get_item(key)
            .map_err(|e| CoreError::Storage(js_message(&e)))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.storage()?
            .set_item(key, value)
            .map_err(|e| CoreError::Storage(js_message(&e)))
    }
}
