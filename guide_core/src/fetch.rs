//! Content-fetch capability and the tickets that tie a fetch back to the
//! session that asked for it.
//!
//! The session never awaits a fetch itself. Commands that start a resolution
//! hand back a [`PendingFetch`]; the host runs it (e.g. with [`fulfil`]) and
//! feeds the resulting [`Completion`] to
//! [`AssistantSession::complete`](crate::AssistantSession::complete).

use async_trait::async_trait;
use guide_rules::{AssistantConfig, DEFAULT_LOCATOR_TEMPLATE, RESOURCE_PLACEHOLDER};
use serde::{Deserialize, Serialize};

use crate::error::FetchError;
use crate::resolver::ContentRequest;

/// Playable locator for a guidance resource (typically a URL).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentLocator(pub String);

impl ContentLocator {
    pub fn new(locator: impl Into<String>) -> Self {
        Self(locator.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Display for ContentLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies one resolution attempt of one session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FetchTicket {
    /// Monotonic per-session counter; each new resolution gets a fresh one.
    pub generation: u64,
    /// Location the session was at when the resolution started.
    pub path: Option<String>,
}

/// A resolution the host must carry out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFetch {
    pub ticket: FetchTicket,
    pub request: ContentRequest,
}

impl PendingFetch {
    /// Pair this ticket with an outcome.
    pub fn complete(self, outcome: Result<ContentLocator, FetchError>) -> Completion {
        Completion {
            ticket: self.ticket,
            outcome,
        }
    }
}

/// Outcome of a fetch, addressed to the resolution that requested it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub ticket: FetchTicket,
    pub outcome: Result<ContentLocator, FetchError>,
}

/// Turns a [`ContentRequest`] into a playable locator.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    async fn fetch(&self, request: &ContentRequest) -> Result<ContentLocator, FetchError>;
}

/// Run `pending` through `fetcher`.
pub async fn fulfil<F>(fetcher: &F, pending: PendingFetch) -> Completion
where
    F: ContentFetcher + ?Sized,
{
    let outcome = fetcher.fetch(&pending.request).await;
    pending.complete(outcome)
}

/// Builds locators by substituting the resource id into a template such as
/// `/api/heygen/videos/{id}`. No I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatorTemplateFetcher {
    template: String,
}

impl LocatorTemplateFetcher {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Use the configured `locator_template`.
    pub fn from_config(config: &AssistantConfig) -> Self {
        Self::new(config.locator_template.clone())
    }

    pub fn template(&self) -> &str {
        &self.template
    }
}

impl Default for LocatorTemplateFetcher {
    fn default() -> Self {
        Self::new(DEFAULT_LOCATOR_TEMPLATE)
    }
}

#[async_trait]
impl ContentFetcher for LocatorTemplateFetcher {
    async fn fetch(&self, request: &ContentRequest) -> Result<ContentLocator, FetchError> {
        let id = request.resource_id.as_str().trim();
        if id.is_empty() {
            return Err(FetchError::EmptyLocator);
        }
        let locator = ContentLocator::new(self.template.replace(RESOURCE_PLACEHOLDER, id));
        if locator.is_empty() {
            return Err(FetchError::EmptyLocator);
        }
        Ok(locator)
    }
}
