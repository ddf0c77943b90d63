//! Presentation-facing snapshot of a session.

use guide_rules::{ContextTag, RoleTag};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Message shown in place of content when a resolution fails.
pub const RESOLUTION_FAILED_MESSAGE: &str =
    "Failed to load navigation assistance. Please try again later.";

/// Unique identifier for a mounted session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Content lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Idle,
    Resolving,
    Ready,
    Error,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Idle => "idle",
            SessionStatus::Resolving => "resolving",
            SessionStatus::Ready => "ready",
            SessionStatus::Error => "error",
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a resolution was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    /// First visit to a location with auto-show enabled.
    Automatic,
    /// The visitor asked for it.
    Manual,
}

/// What the presentation layer renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantView {
    pub status: SessionStatus,
    pub visible: bool,
    pub muted: bool,
    pub auto_show_disabled: bool,
    pub context: ContextTag,
    pub role: RoleTag,
    /// Present only while `status` is `Ready`.
    pub locator: Option<String>,
    /// Present only while `status` is `Error`.
    pub error_message: Option<String>,
}
