//! Persisted key-value capability.
//!
//! The engine only ever stores two keys per namespace (see [`StorageKeys`]);
//! values are JSON documents the engine owns.

mod file;
mod memory;

pub use file::*;
pub use memory::*;

use crate::error::Result;

/// Key holding the `path -> true` map of auto-presented locations.
pub const VISITED_PAGES_KEY: &str = "visited-pages";

/// Key holding the global auto-show opt-out flag.
pub const AUTO_SHOW_DISABLED_KEY: &str = "auto-show-disabled";

/// Key-value storage scoped to one visitor profile.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}

/// The concrete key names for one namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub visited_pages: String,
    pub auto_show_disabled: String,
}

impl StorageKeys {
    pub fn new(namespace: Option<&str>) -> Self {
        match namespace {
            Some(ns) => Self {
                visited_pages: format!("{}-{}", ns, VISITED_PAGES_KEY),
                auto_show_disabled: format!("{}-{}", ns, AUTO_SHOW_DISABLED_KEY),
            },
            None => Self {
                visited_pages: VISITED_PAGES_KEY.to_string(),
                auto_show_disabled: AUTO_SHOW_DISABLED_KEY.to_string(),
            },
        }
    }
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self::new(None)
    }
}
