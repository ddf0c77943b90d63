//! Content resolver - decides *what* to ask the content-fetch capability for.

use guide_rules::{ContentCatalog, ContextTag, ResourceId, RoleTag};
use serde::{Deserialize, Serialize};

/// A request for one piece of guidance content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentRequest {
    pub context: ContextTag,
    pub role: RoleTag,
    pub resource_id: ResourceId,
}

/// Pure mapping from `(context, role)` to a [`ContentRequest`].
#[derive(Debug, Clone, Default)]
pub struct ContentResolver {
    catalog: ContentCatalog,
}

impl ContentResolver {
    pub fn new(catalog: ContentCatalog) -> Self {
        Self { catalog }
    }

    pub fn resolve(&self, context: &ContextTag, role: &RoleTag) -> ContentRequest {
        ContentRequest {
            context: context.clone(),
            role: role.clone(),
            resource_id: self.catalog.lookup(context, role).clone(),
        }
    }

    pub fn catalog(&self) -> &ContentCatalog {
        &self.catalog
    }
}
