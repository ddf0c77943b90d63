//! Visit ledger - which locations already presented guidance on their own,
//! and whether the visitor opted out of automatic presentation altogether.
//!
//! The ledger is loaded once when a session mounts and written through on
//! every change. Persistence problems never surface to the caller: a failed
//! read starts from an empty ledger and a failed write is dropped, so the
//! worst case is guidance appearing again on a later visit.

use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::error::Result;
use crate::storage::{KeyValueStore, StorageKeys};

/// Persisted record of auto-presented paths plus the opt-out flag.
#[derive(Debug)]
pub struct VisitLedger<S> {
    store: S,
    keys: StorageKeys,
    visited: BTreeMap<String, bool>,
    auto_show_disabled: bool,
}

impl<S: KeyValueStore> VisitLedger<S> {
    /// Load the ledger from `store`, falling back to defaults on any read error.
    pub fn load(store: S, keys: StorageKeys) -> Self {
        let visited = match read_json::<BTreeMap<String, bool>>(&store, &keys.visited_pages) {
            Ok(map) => map.unwrap_or_default(),
            Err(e) => {
                warn!(key = %keys.visited_pages, error = %e, "failed to read visit ledger, starting empty");
                BTreeMap::new()
            }
        };

        let auto_show_disabled = match read_json::<bool>(&store, &keys.auto_show_disabled) {
            Ok(flag) => flag.unwrap_or(false),
            Err(e) => {
                warn!(key = %keys.auto_show_disabled, error = %e, "failed to read auto-show flag, assuming enabled");
                false
            }
        };

        debug!(
            visited = visited.len(),
            auto_show_disabled, "visit ledger loaded"
        );

        Self {
            store,
            keys,
            visited,
            auto_show_disabled,
        }
    }

    /// Whether `path` has already triggered an automatic presentation.
    pub fn has_auto_presented(&self, path: &str) -> bool {
        self.visited.get(path).copied().unwrap_or(false)
    }

    /// Record that `path` auto-presented. Marking twice is a no-op.
    pub fn mark_auto_presented(&mut self, path: &str) {
        if self.has_auto_presented(path) {
            return;
        }
        self.visited.insert(path.to_string(), true);

        let result = serde_json::to_string(&self.visited)
            .map_err(Into::into)
            .and_then(|json| self.store.set(&self.keys.visited_pages, &json));
        if let Err(e) = result {
            warn!(path, error = %e, "failed to persist visit ledger, dropping write");
        }
    }

    pub fn is_auto_show_disabled(&self) -> bool {
        self.auto_show_disabled
    }

    pub fn set_auto_show_disabled(&mut self, disabled: bool) {
        self.auto_show_disabled = disabled;

        let json = if disabled { "true" } else { "false" };
        if let Err(e) = self.store.set(&self.keys.auto_show_disabled, json) {
            warn!(disabled, error = %e, "failed to persist auto-show flag, dropping write");
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

fn read_json<T: serde::de::DeserializeOwned>(
    store: &impl KeyValueStore,
    key: &str,
) -> Result<Option<T>> {
    match store.get(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}
