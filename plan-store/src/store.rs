//! Key-value storage capability
//!
//! The whole persistence surface is one synchronous key -> JSON-document
//! store. The host environment decides what backs it (browser localStorage,
//! a file, an embedded DB); the core only sees this trait. Reads are
//! fail-soft: corrupt or missing data falls back to a caller default and is
//! logged, never propagated.

use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;

/// Fixed document keys
pub const PLANS_KEY: &str = "portfolio.plans";
pub const CURRICULUM_KEY: &str = "portfolio.curriculum";
pub const YEARS_KEY: &str = "portfolio.years";
pub const PREFS_KEY: &str = "portfolio.prefs";

/// Synchronous key -> JSON-document store. Last write wins; no transactions.
pub trait KeyValueStore {
    /// Raw document for a key, if present
    fn get_raw(&self, key: &str) -> Option<String>;

    /// Replace the document under a key
    fn put_raw(&self, key: &str, value: &str);
}

/// Typed helpers over any [`KeyValueStore`], including trait objects.
pub trait KeyValueStoreExt: KeyValueStore {
    /// Read and decode a document, falling back to `default` when the key is
    /// missing or the stored JSON does not parse.
    fn read<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.get_raw(key) {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(value) => value,
                Err(err) => {
                    tracing::warn!(key, %err, "unparseable stored document, using default");
                    default
                }
            },
            None => default,
        }
    }

    /// Encode and write a document. Serialization failure is logged and
    /// swallowed; the previous document stays in place.
    fn write<T: Serialize>(&self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(raw) => self.put_raw(key, &raw),
            Err(err) => {
                tracing::warn!(key, %err, "failed to serialize document, write skipped");
            }
        }
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStoreExt for S {}

/// In-memory store backing, used by tests and native harnesses.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents
    pub fn len(&self) -> usize {
        self.entries.lock().expect("store lock").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get_raw(&self, key: &str) -> Option<String> {
        self.entries.lock().expect("store lock").get(key).cloned()
    }

    fn put_raw(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .expect("store lock")
            .insert(key.to_string(), value.to_string());
    }
}
