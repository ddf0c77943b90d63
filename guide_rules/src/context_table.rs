//! Context table - maps a location path to the context tag it belongs to.
//!
//! Lookup order:
//! 1. **Exact**: a pattern equal to the path
//! 2. **Prefix**: the longest non-root pattern the path starts with
//! 3. **Default**: the table's default tag (`"welcome"` for the built-in table)

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::TableError;
use crate::tags::ContextTag;

/// The root pattern. It only ever matches exactly.
pub const ROOT_PATTERN: &str = "/";

/// Tag returned when nothing in the table matches.
pub const DEFAULT_CONTEXT: &str = "welcome";

/// A single `(pattern, tag)` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextEntry {
    pub pattern: String,
    pub tag: ContextTag,
}

impl ContextEntry {
    pub fn new(pattern: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            tag: ContextTag::new(tag),
        }
    }
}

/// Ordered lookup table from path pattern to context tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextTable {
    entries: Vec<ContextEntry>,
    default_tag: ContextTag,
}

impl ContextTable {
    /// Build a table, rejecting empty or duplicated patterns.
    pub fn new(
        entries: Vec<ContextEntry>,
        default_tag: impl Into<String>,
    ) -> Result<Self, TableError> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if entry.pattern.is_empty() {
                return Err(TableError::EmptyKey { table: "context" });
            }
            if !seen.insert(entry.pattern.as_str()) {
                return Err(TableError::DuplicateEntry {
                    table: "context",
                    key: entry.pattern.clone(),
                });
            }
        }

        Ok(Self {
            entries,
            default_tag: ContextTag::new(default_tag),
        })
    }

    /// The table shipped with the platform.
    pub fn builtin() -> Self {
        let entries = [
            ("/", "welcome"),
            ("/dashboard", "dashboard"),
            ("/curriculum", "curriculum"),
            ("/progress", "progress-tracking"),
            ("/settings", "settings"),
            ("/accessibility", "accessibility"),
            ("/pricing", "pricing"),
            ("/subscriptions", "subscriptions"),
            ("/credits", "credits"),
            ("/profile", "profile"),
            ("/help", "help"),
            ("/register", "registration"),
            ("/login", "login"),
        ]
        .into_iter()
        .map(|(pattern, tag)| ContextEntry::new(pattern, tag))
        .collect();

        Self {
            entries,
            default_tag: ContextTag::new(DEFAULT_CONTEXT),
        }
    }

    /// Resolve a path to its context tag. Total over all inputs.
    pub fn resolve(&self, path: &str) -> ContextTag {
        if let Some(entry) = self.entries.iter().find(|e| e.pattern == path) {
            return entry.tag.clone();
        }

        self.entries
            .iter()
            .filter(|e| e.pattern != ROOT_PATTERN && path.starts_with(e.pattern.as_str()))
            .max_by_key(|e| e.pattern.len())
            .map(|e| e.tag.clone())
            .unwrap_or_else(|| self.default_tag.clone())
    }

    /// Append an entry, replacing any existing row with the same pattern.
    pub fn upsert(&mut self, entry: ContextEntry) {
        match self.entries.iter_mut().find(|e| e.pattern == entry.pattern) {
            Some(existing) => existing.tag = entry.tag,
            None => self.entries.push(entry),
        }
    }

    pub fn default_tag(&self) -> &ContextTag {
        &self.default_tag
    }

    pub fn entries(&self) -> &[ContextEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ContextTable {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        let table = ContextTable::builtin();
        assert_eq!(table.resolve("/pricing").as_str(), "pricing");
        assert_eq!(table.resolve("/").as_str(), "welcome");
        assert_eq!(table.resolve("/register").as_str(), "registration");
    }

    #[test]
    fn test_nested_route_uses_prefix() {
        let table = ContextTable::builtin();
        assert_eq!(table.resolve("/dashboard/settings").as_str(), "dashboard");
        assert_eq!(table.resolve("/progress/week/3").as_str(), "progress-tracking");
    }

    #[test]
    fn test_longest_prefix_wins() {
        let table = ContextTable::new(
            vec![
                ContextEntry::new("/", "welcome"),
                ContextEntry::new("/dashboard", "dashboard"),
                ContextEntry::new("/dashboard/reports", "reports"),
            ],
            "welcome",
        )
        .unwrap();

        assert_eq!(table.resolve("/dashboard/reports/q1").as_str(), "reports");
        assert_eq!(table.resolve("/dashboard/settings").as_str(), "dashboard");
    }

    #[test]
    fn test_longest_prefix_independent_of_order() {
        let table = ContextTable::new(
            vec![
                ContextEntry::new("/dashboard/reports", "reports"),
                ContextEntry::new("/dashboard", "dashboard"),
            ],
            "welcome",
        )
        .unwrap();

        assert_eq!(table.resolve("/dashboard/reports/q1").as_str(), "reports");
    }

    #[test]
    fn test_root_never_matches_as_prefix() {
        let table = ContextTable::new(
            vec![ContextEntry::new("/", "home")],
            "fallback",
        )
        .unwrap();

        assert_eq!(table.resolve("/").as_str(), "home");
        assert_eq!(table.resolve("/unknown").as_str(), "fallback");
    }

    #[test]
    fn test_unmatched_paths_fall_back_to_default() {
        let table = ContextTable::builtin();
        assert_eq!(table.resolve("/about/team").as_str(), "welcome");
        assert_eq!(table.resolve("").as_str(), "welcome");
        assert_eq!(table.resolve("no-slash").as_str(), "welcome");
    }

    #[test]
    fn test_duplicate_pattern_rejected() {
        let err = ContextTable::new(
            vec![
                ContextEntry::new("/help", "help"),
                ContextEntry::new("/help", "support"),
            ],
            "welcome",
        )
        .unwrap_err();

        assert_eq!(
            err,
            TableError::DuplicateEntry {
                table: "context",
                key: "/help".to_string()
            }
        );
    }

    #[test]
    fn test_empty_pattern_rejected() {
        let err = ContextTable::new(vec![ContextEntry::new("", "x")], "welcome").unwrap_err();
        assert_eq!(err, TableError::EmptyKey { table: "context" });
    }

    #[test]
    fn test_upsert_replaces_existing_pattern() {
        let mut table = ContextTable::builtin();
        let before = table.len();

        table.upsert(ContextEntry::new("/help", "support"));
        table.upsert(ContextEntry::new("/library", "library"));

        assert_eq!(table.len(), before + 1);
        assert_eq!(table.resolve("/help").as_str(), "support");
        assert_eq!(table.resolve("/library/books").as_str(), "library");
    }
}
