//! Durable key-value storage
//!
//! Features:
//! - `KeyValueStore` trait over string keys and values
//! - `MemoryStore` for native builds and tests
//! - `LocalStore` backed by browser LocalStorage (wasm32 only)

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::Debug;
use std::rc::Rc;

use crate::error::GameError;

#[cfg(target_arch = "wasm32")]
mod local;

#[cfg(target_arch = "wasm32")]
pub use local::LocalStore;

/// String key-value storage that outlives a session
pub trait KeyValueStore: Debug {
    /// Stored value, `None` when missing or unreadable
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), GameError>;
}

/// In-memory store; clones share the same entries
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a single entry
    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), GameError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
