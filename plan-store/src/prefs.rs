//! Persisted UI preferences
//!
//! One JSON blob under a fixed key: density, fit mode and filter state.
//! Every field has a serde default so blobs written by older app versions
//! keep parsing.

use crate::store::{KeyValueStore, KeyValueStoreExt, PREFS_KEY};
use serde::{Deserialize, Serialize};

/// Layout density preset for the matrix grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Density {
    Normal,
    Compact,
    Ultra,
}

impl Density {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Compact => "compact",
            Self::Ultra => "ultra",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "normal" => Some(Self::Normal),
            "compact" => Some(Self::Compact),
            "ultra" => Some(Self::Ultra),
            _ => None,
        }
    }
}

impl Default for Density {
    fn default() -> Self {
        Self::Normal
    }
}

/// What happens to artifacts the active filter does not match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Keep non-matching artifacts in place at reduced opacity
    Dim,
    /// Remove non-matching artifacts from layout entirely
    Hide,
}

impl Default for FilterMode {
    fn default() -> Self {
        Self::Dim
    }
}

/// The persisted preference blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct UiPrefs {
    pub density: Density,
    pub fit_mode: bool,
    pub filter_kinds: Vec<String>,
    pub filter_perspectives: Vec<String>,
    pub filter_mode: FilterMode,
}

impl UiPrefs {
    /// Read the blob, defaulting when absent or corrupt.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        store.read(PREFS_KEY, UiPrefs::default())
    }

    /// Persist the blob.
    pub fn save(&self, store: &dyn KeyValueStore) {
        store.write(PREFS_KEY, self);
    }
}
