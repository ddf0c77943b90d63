//! Assistant configuration.
//!
//! Loading flow:
//! 1. Start with [`AssistantConfig::default()`] (built-in tables, auto-show on)
//! 2. If a TOML file is given and exists, its values replace the defaults
//! 3. [`AssistantConfig::context_table`] / [`AssistantConfig::role_table`]
//!    layer the configured rows over the built-in tables
//!
//! ```toml
//! auto_show_on_first_visit = true
//! storage_namespace = "avatar"
//!
//! [[contexts]]
//! pattern = "/library"
//! tag = "library"
//!
//! [[roles]]
//! external_id = "TUTOR"
//! tag = "educator"
//!
//! [catalog]
//! default_resource = "e12f05f24ead42619b4aa8124d98880d"
//!
//! [[catalog.rules]]
//! context = "pricing"
//! resource = "pricing-walkthrough"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::catalog::ContentCatalog;
use crate::context_table::{ContextEntry, ContextTable, DEFAULT_CONTEXT};
use crate::error::{ConfigError, Result};
use crate::role_table::{RoleEntry, RoleTable, GUEST_ROLE, MEMBER_DEFAULT_ROLE};

/// Placeholder substituted with the resource id in [`AssistantConfig::locator_template`].
pub const RESOURCE_PLACEHOLDER: &str = "{id}";

/// Default locator template for guidance videos.
pub const DEFAULT_LOCATOR_TEMPLATE: &str = "/api/heygen/videos/{id}";

/// Everything the engine needs that is not per-session state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Whether the first visit to a location presents guidance unprompted.
    pub auto_show_on_first_visit: bool,

    /// Prefix for persisted keys, e.g. `"avatar"` gives `"avatar-visited-pages"`.
    pub storage_namespace: Option<String>,

    /// When false, the configured rows replace the built-in tables
    /// instead of extending them.
    pub extend_builtin_tables: bool,

    pub default_context: String,
    pub guest_role: String,
    pub member_default_role: String,

    /// Locator produced for a resource; must contain `{id}`.
    pub locator_template: String,

    pub contexts: Vec<ContextEntry>,
    pub roles: Vec<RoleEntry>,
    pub catalog: ContentCatalog,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            auto_show_on_first_visit: true,
            storage_namespace: None,
            extend_builtin_tables: true,
            default_context: DEFAULT_CONTEXT.to_string(),
            guest_role: GUEST_ROLE.to_string(),
            member_default_role: MEMBER_DEFAULT_ROLE.to_string(),
            locator_template: DEFAULT_LOCATOR_TEMPLATE.to_string(),
            contexts: Vec::new(),
            roles: Vec::new(),
            catalog: ContentCatalog::default(),
        }
    }
}

impl AssistantConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<()> {
        if !self.locator_template.contains(RESOURCE_PLACEHOLDER) {
            return Err(ConfigError::InvalidValue(format!(
                "locator_template must contain {}",
                RESOURCE_PLACEHOLDER
            )));
        }
        if self.default_context.is_empty() {
            return Err(ConfigError::InvalidValue(
                "default_context must not be empty".to_string(),
            ));
        }
        if self.catalog.default_resource.as_str().is_empty() {
            return Err(ConfigError::InvalidValue(
                "catalog.default_resource must not be empty".to_string(),
            ));
        }
        if matches!(self.storage_namespace.as_deref(), Some("")) {
            return Err(ConfigError::InvalidValue(
                "storage_namespace must not be empty when set".to_string(),
            ));
        }

        // Reject duplicates inside the configured rows themselves.
        ContextTable::new(self.contexts.clone(), self.default_context.clone())?;
        RoleTable::new(
            self.roles.clone(),
            self.guest_role.clone(),
            self.member_default_role.clone(),
        )?;
        Ok(())
    }

    /// Build the context table this configuration describes.
    pub fn context_table(&self) -> Result<ContextTable> {
        if !self.extend_builtin_tables {
            return Ok(ContextTable::new(
                self.contexts.clone(),
                self.default_context.clone(),
            )?);
        }

        let mut table = ContextTable::new(
            ContextTable::builtin().entries().to_vec(),
            self.default_context.clone(),
        )?;
        for entry in &self.contexts {
            table.upsert(entry.clone());
        }
        Ok(table)
    }

    /// Build the role table this configuration describes.
    pub fn role_table(&self) -> Result<RoleTable> {
        let base = if self.extend_builtin_tables {
            RoleTable::builtin().entries().to_vec()
        } else {
            Vec::new()
        };

        let mut table = RoleTable::new(
            base,
            self.guest_role.clone(),
            self.member_default_role.clone(),
        )?;
        for entry in &self.roles {
            table.upsert(entry.clone());
        }
        Ok(table)
    }
}
