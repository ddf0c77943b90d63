//! Role table - maps the identity provider's role identifier to a
//! presentation role.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::TableError;
use crate::tags::RoleTag;

/// Role for visitors without an authenticated identity.
pub const GUEST_ROLE: &str = "guest";

/// Role for authenticated visitors whose role is missing or unmapped.
pub const MEMBER_DEFAULT_ROLE: &str = "student-secondary";

/// What the identity source knows about the current visitor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// External role identifier, e.g. `"TEACHER"`.
    pub role: Option<String>,
}

impl Identity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_role(role: impl Into<String>) -> Self {
        Self {
            role: Some(role.into()),
        }
    }
}

/// A single `(external id, role tag)` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleEntry {
    pub external_id: String,
    pub tag: RoleTag,
}

impl RoleEntry {
    pub fn new(external_id: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            external_id: external_id.into(),
            tag: RoleTag::new(tag),
        }
    }
}

/// Fixed enumeration of known roles plus the two fallbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleTable {
    entries: Vec<RoleEntry>,
    guest: RoleTag,
    member_default: RoleTag,
}

impl RoleTable {
    pub fn new(
        entries: Vec<RoleEntry>,
        guest: impl Into<String>,
        member_default: impl Into<String>,
    ) -> Result<Self, TableError> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if entry.external_id.is_empty() {
                return Err(TableError::EmptyKey { table: "role" });
            }
            if !seen.insert(entry.external_id.as_str()) {
                return Err(TableError::DuplicateEntry {
                    table: "role",
                    key: entry.external_id.clone(),
                });
            }
        }

        Ok(Self {
            entries,
            guest: RoleTag::new(guest),
            member_default: RoleTag::new(member_default),
        })
    }

    pub fn builtin() -> Self {
        let entries = [
            ("STUDENT_PRIMARY", "student-primary"),
            ("STUDENT_SECONDARY", "student-secondary"),
            ("TEACHER", "educator"),
            ("PARENT", "parent"),
            ("ADMIN", "admin"),
            ("CONTENT_CREATOR", "content-creator"),
        ]
        .into_iter()
        .map(|(id, tag)| RoleEntry::new(id, tag))
        .collect();

        Self {
            entries,
            guest: RoleTag::new(GUEST_ROLE),
            member_default: RoleTag::new(MEMBER_DEFAULT_ROLE),
        }
    }

    /// Resolve the presentation role for a visitor. Never fails.
    ///
    /// Lookup is case-sensitive: `"teacher"` is not `"TEACHER"`.
    pub fn resolve(&self, identity: Option<&Identity>) -> RoleTag {
        let Some(identity) = identity else {
            return self.guest.clone();
        };

        identity
            .role
            .as_deref()
            .and_then(|role| self.lookup(role))
            .cloned()
            .unwrap_or_else(|| self.member_default.clone())
    }

    /// Exact lookup of a single external identifier.
    pub fn lookup(&self, external_id: &str) -> Option<&RoleTag> {
        self.entries
            .iter()
            .find(|e| e.external_id == external_id)
            .map(|e| &e.tag)
    }

    pub fn upsert(&mut self, entry: RoleEntry) {
        match self
            .entries
            .iter_mut()
            .find(|e| e.external_id == entry.external_id)
        {
            Some(existing) => existing.tag = entry.tag,
            None => self.entries.push(entry),
        }
    }

    pub fn set_guest(&mut self, tag: impl Into<String>) {
        self.guest = RoleTag::new(tag);
    }

    pub fn set_member_default(&mut self, tag: impl Into<String>) {
        self.member_default = RoleTag::new(tag);
    }

    pub fn guest(&self) -> &RoleTag {
        &self.guest
    }

    pub fn member_default(&self) -> &RoleTag {
        &self.member_default
    }

    pub fn entries(&self) -> &[RoleEntry] {
        &self.entries
    }
}

impl Default for RoleTable {
    fn default() -> Self {
        Self::builtin()
    }
}
