//! Key/value persistence
//!
//! A small string store abstraction with two backends: `MemoryStore` here and
//! the browser's localStorage in `platform::storage`. `WebData` layers typed
//! values on top, namespacing each type with its own key prefix.

use std::collections::BTreeMap;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("storage is not available")]
    Unavailable,
    #[error("storage backend error: {0}")]
    Backend(String),
    #[error("value \"{value}\" under \"{key}\" is not a valid {expected}")]
    Parse {
        key: String,
        value: String,
        expected: &'static str,
    },
}

/// A flat string-to-string store
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
    fn clear(&mut self) -> Result<(), StorageError>;
    /// Number of stored keys
    fn len(&self) -> Result<usize, StorageError>;

    fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.len()? == 0)
    }
}

/// In-process store, used natively and in tests
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        self.entries.clear();
        Ok(())
    }

    fn len(&self) -> Result<usize, StorageError> {
        Ok(self.entries.len())
    }
}

const INT_PREFIX: &str = "int_";
const FLOAT_PREFIX: &str = "float_";
const STRING_PREFIX: &str = "string_";

/// Typed values over a `KeyValueStore`
#[derive(Debug, Clone, Default)]
pub struct WebData<S> {
    store: S,
}

impl<S: KeyValueStore> WebData<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Raw access, no prefix
    pub fn save_data(&mut self, name: &str, value: &str) -> Result<(), StorageError> {
        self.store.set(name, value)
    }

    pub fn load_data(&self, name: &str) -> Result<Option<String>, StorageError> {
        self.store.get(name)
    }

    pub fn delete_data(&mut self, name: &str) -> Result<(), StorageError> {
        self.store.remove(name)
    }

    pub fn save_int(&mut self, name: &str, value: i64) -> Result<(), StorageError> {
        self.store.set(&format!("{INT_PREFIX}{name}"), &value.to_string())
    }

    pub fn load_int(&self, name: &str) -> Result<Option<i64>, StorageError> {
        self.load_parsed(&format!("{INT_PREFIX}{name}"), "integer")
    }

    pub fn delete_int(&mut self, name: &str) -> Result<(), StorageError> {
        self.store.remove(&format!("{INT_PREFIX}{name}"))
    }

    pub fn save_float(&mut self, name: &str, value: f64) -> Result<(), StorageError> {
        self.store.set(&format!("{FLOAT_PREFIX}{name}"), &value.to_string())
    }

    pub fn load_float(&self, name: &str) -> Result<Option<f64>, StorageError> {
        self.load_parsed(&format!("{FLOAT_PREFIX}{name}"), "float")
    }

    pub fn delete_float(&mut self, name: &str) -> Result<(), StorageError> {
        self.store.remove(&format!("{FLOAT_PREFIX}{name}"))
    }

    pub fn save_string(&mut self, name: &str, value: &str) -> Result<(), StorageError> {
        self.store.set(&format!("{STRING_PREFIX}{name}"), value)
    }

    pub fn load_string(&self, name: &str) -> Result<Option<String>, StorageError> {
        self.store.get(&format!("{STRING_PREFIX}{name}"))
    }

    pub fn delete_string(&mut self, name: &str) -> Result<(), StorageError> {
        self.store.remove(&format!("{STRING_PREFIX}{name}"))
    }

    /// Wipe the whole store, including keys written by others
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.store.clear()
    }

    pub fn len(&self) -> Result<usize, StorageError> {
        self.store.len()
    }

    pub fn is_empty(&self) -> Result<bool, StorageError> {
        self.store.is_empty()
    }

    fn load_parsed<T: FromStr>(
        &self,
        key: &str,
        expected: &'static str,
    ) -> Result<Option<T>, StorageError> {
        let Some(raw) = self.store.get(key)? else {
            return Ok(None);
        };
        raw.trim().parse().map(Some).map_err(|_| StorageError::Parse {
            key: key.to_string(),
            value: raw,
            expected,
        })
    }
}
