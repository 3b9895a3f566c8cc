//! Browser localStorage backend

use wasm_bindgen::JsValue;
use web_sys::Storage;

use crate::persistence::{KeyValueStore, StorageError};

fn js_error(e: JsValue) -> StorageError {
    StorageError::Backend(format!("{:?}", e))
}

/// `window.localStorage`
pub struct LocalStore {
    storage: Storage,
}

impl LocalStore {
    pub fn open() -> Result<Self, StorageError> {
        let storage = web_sys::window()
            .ok_or(StorageError::Unavailable)?
            .local_storage()
            .map_err(js_error)?
            .ok_or(StorageError::Unavailable)?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage.get_item(key).map_err(js_error)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage.set_item(key, value).map_err(js_error)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.storage.remove_item(key).map_err(js_error)
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        self.storage.clear().map_err(js_error)
    }

    fn len(&self) -> Result<usize, StorageError> {
        self.storage.length().map(|n| n as usize).map_err(js_error)
    }
}
