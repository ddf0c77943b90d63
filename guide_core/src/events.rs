//! Events a host delivers to an [`AssistantSession`](crate::AssistantSession).

use guide_rules::Identity;

use crate::fetch::Completion;

/// Everything that can happen to a session, in the order the host sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssistantEvent {
    /// The router moved to a new path.
    LocationChanged { path: String },

    /// The identity provider reported a (possibly absent) visitor.
    IdentityChanged { identity: Option<Identity> },

    /// The visitor pressed the assistant button.
    OpenRequested,

    /// The visitor asked to try a failed resolution again.
    RetryRequested,

    /// The visitor closed the assistant.
    DismissRequested,

    MuteToggled,

    AutoShowToggled,

    /// A fetch started by this session finished.
    ContentDelivered(Completion),
}

impl AssistantEvent {
    pub fn location(path: impl Into<String>) -> Self {
        AssistantEvent::LocationChanged { path: path.into() }
    }

    /// Short name for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            AssistantEvent::LocationChanged { .. } => "location_changed",
            AssistantEvent::IdentityChanged { .. } => "identity_changed",
            AssistantEvent::OpenRequested => "open",
            AssistantEvent::RetryRequested => "retry",
            AssistantEvent::DismissRequested => "dismiss",
            AssistantEvent::MuteToggled => "toggle_mute",
            AssistantEvent::AutoShowToggled => "toggle_auto_show",
            AssistantEvent::ContentDelivered(_) => "content_delivered",
        }
    }

    /// Whether the event came from the visitor rather than the environment.
    pub fn is_user_command(&self) -> bool {
        matches!(
            self,
            AssistantEvent::OpenRequested
                | AssistantEvent::RetryRequested
                | AssistantEvent::DismissRequested
                | AssistantEvent::MuteToggled
                | AssistantEvent::AutoShowToggled
        )
    }
}
