//! Session-scoped key/value storage

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::CoreError;
use crate::Result;

pub trait SessionStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

#[derive(Debug, Default)]
struct Entries {
    values: HashMap<String, String>,
    failing: bool,
}

/// In-memory store. Clones share entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<Entries>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every access fail, as a browser with storage disabled would
    pub fn failing(self) -> Self {
        self.entries.borrow_mut().failing = true;
        self
    }

    pub fn with_entry(self, key: &str, value: &str) -> Self {
        self.entries
            .borrow_mut()
            .values
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.entries.borrow().values.get(key).cloned()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.borrow();
        if entries.failing {
            return Err(CoreError::Storage("storage disabled".to_string()));
        }
        Ok(entries.values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.borrow_mut();
        if entries.failing {
            return Err(CoreError::Storage("storage disabled".to_string()));
        }
        entries.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
