//! Browser LocalStorage backend

use super::KeyValueStore;
use crate::error::GameError;

/// Handle to `window.localStorage`; a missing or blocked storage reads as empty
#[derive(Debug, Clone, Default)]
pub struct LocalStore;

impl LocalStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), GameError> {
        let storage = Self::storage()
            .ok_or_else(|| GameError::Storage("LocalStorage unavailable".to_string()))?;
        storage
            .set_item(key, value)
            .map_err(|e| GameError::Storage(format!("{:?}", e)))
    }
}
