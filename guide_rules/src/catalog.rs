//! Content catalog - which guidance resource belongs to which
//! `(context, role)` pair.

use serde::{Deserialize, Serialize};

use crate::tags::{ContextTag, ResourceId, RoleTag};

/// Resource played when no rule matches.
pub const DEFAULT_RESOURCE: &str = "e12f05f24ead42619b4aa8124d98880d";

/// One catalog row. A missing context or role acts as a wildcard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<ContextTag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<RoleTag>,
    pub resource: ResourceId,
}

impl ContentRule {
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            context: None,
            role: None,
            resource: ResourceId::new(resource),
        }
    }

    pub fn for_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(ContextTag::new(context));
        self
    }

    pub fn for_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(RoleTag::new(role));
        self
    }

    /// Match strength: 3 for context+role, 2 for context only, 1 for role
    /// only, 0 for a catch-all. `None` if the rule does not apply.
    fn specificity(&self, context: &ContextTag, role: &RoleTag) -> Option<u8> {
        match (&self.context, &self.role) {
            (Some(c), Some(r)) if c == context && r == role => Some(3),
            (Some(c), None) if c == context => Some(2),
            (None, Some(r)) if r == role => Some(1),
            (None, None) => Some(0),
            _ => None,
        }
    }
}

/// Ordered list of content rules plus a fallback resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentCatalog {
    #[serde(default = "default_resource")]
    pub default_resource: ResourceId,
    #[serde(default)]
    pub rules: Vec<ContentRule>,
}

fn default_resource() -> ResourceId {
    ResourceId::new(DEFAULT_RESOURCE)
}

impl Default for ContentCatalog {
    fn default() -> Self {
        Self {
            default_resource: default_resource(),
            rules: Vec::new(),
        }
    }
}

impl ContentCatalog {
    pub fn new(default_resource: impl Into<String>) -> Self {
        Self {
            default_resource: ResourceId::new(default_resource),
            rules: Vec::new(),
        }
    }

    pub fn with_rule(mut self, rule: ContentRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Pick the most specific rule for the pair. Among equally specific
    /// rules the first one listed wins.
    pub fn lookup(&self, context: &ContextTag, role: &RoleTag) -> &ResourceId {
        let mut best: Option<(u8, &ContentRule)> = None;
        for rule in &self.rules {
            if let Some(score) = rule.specificity(context, role) {
                if best.map_or(true, |(s, _)| score > s) {
                    best = Some((score, rule));
                }
            }
        }

        best.map(|(_, rule)| &rule.resource)
            .unwrap_or(&self.default_resource)
    }
}
