use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use guide_core::{
    fulfil, AssistantEvent, AssistantSession, ContentFetcher, ContentLocator, ContentRequest,
    FetchError, FileStore, KeyValueStore, LocatorTemplateFetcher, MemoryStore, SessionStatus,
};
use guide_rules::{AssistantConfig, ContentRule, Identity};

/// Fails the first `failures` fetches, then builds locators from the template.
struct FlakyFetcher {
    failures: usize,
    calls: AtomicUsize,
    inner: LocatorTemplateFetcher,
}

impl FlakyFetcher {
    fn new(failures: usize) -> Self {
        Self {
            failures,
            calls: AtomicUsize::new(0),
            inner: LocatorTemplateFetcher::default(),
        }
    }
}

#[async_trait]
impl ContentFetcher for FlakyFetcher {
    async fn fetch(&self, request: &ContentRequest) -> Result<ContentLocator, FetchError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures {
            return Err(FetchError::Failed(format!("attempt {} refused", call + 1)));
        }
        self.inner.fetch(request).await
    }
}

#[tokio::test]
async fn test_first_visit_then_later_session() {
    let store = MemoryStore::new();
    let config = AssistantConfig::default();
    let fetcher = LocatorTemplateFetcher::default();

    let mut first = AssistantSession::mount(&config, store.clone(), None).unwrap();
    let pending = first.location_changed("/dashboard").unwrap();
    assert_eq!(first.status(), SessionStatus::Resolving);

    let completion = fulfil(&fetcher, pending).await;
    assert!(first.complete(completion));

    let view = first.view();
    assert_eq!(view.status, SessionStatus::Ready);
    assert!(view.visible);
    assert_eq!(
        view.locator.as_deref(),
        Some("/api/heygen/videos/e12f05f24ead42619b4aa8124d98880d")
    );
    assert_eq!(
        store.get("visited-pages").unwrap().as_deref(),
        Some(r#"{"/dashboard":true}"#)
    );
    first.unmount();

    let mut second = AssistantSession::mount(&config, store, None).unwrap();
    assert!(second.location_changed("/dashboard").is_none());
    assert_eq!(second.status(), SessionStatus::Idle);
    assert!(!second.is_visible());

    let pending = second.open();
    assert_eq!(second.status(), SessionStatus::Resolving);
    let completion = fulfil(&fetcher, pending).await;
    assert!(second.complete(completion));
    assert_eq!(second.status(), SessionStatus::Ready);
    assert!(second.is_visible());
}

#[tokio::test]
async fn test_retry_after_failure() {
    let fetcher = FlakyFetcher::new(1);
    let mut session =
        AssistantSession::mount(&AssistantConfig::default(), MemoryStore::new(), None).unwrap();

    let pending = session.location_changed("/progress/term-1").unwrap();
    let original = pending.request.clone();
    session.complete(fulfil(&fetcher, pending).await);

    let view = session.view();
    assert_eq!(view.status, SessionStatus::Error);
    assert!(view.visible);
    assert!(view.error_message.is_some());

    let pending = session.retry().unwrap();
    assert_eq!(session.status(), SessionStatus::Resolving);
    assert_eq!(pending.request, original);
    assert_eq!(pending.request.context.as_str(), "progress-tracking");

    session.complete(fulfil(&fetcher, pending).await);
    assert_eq!(session.status(), SessionStatus::Ready);
    assert!(session.view().locator.is_some());
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_retry_after_moving_replays_failed_request() {
    let fetcher = FlakyFetcher::new(1);
    let store = MemoryStore::new();
    let mut session =
        AssistantSession::mount(&AssistantConfig::default(), store.clone(), None).unwrap();

    let pending = session.location_changed("/curriculum").unwrap();
    let failed_request = pending.request.clone();
    session.complete(fulfil(&fetcher, pending).await);
    assert_eq!(session.status(), SessionStatus::Error);

    // Error is on screen, so moving does not start a new automatic resolution.
    assert!(session.location_changed("/pricing").is_none());

    let pending = session.retry().unwrap();
    assert_eq!(pending.request, failed_request);
    assert_eq!(pending.request.context.as_str(), "curriculum");

    assert!(session.complete(fulfil(&fetcher, pending).await));
    assert_eq!(session.status(), SessionStatus::Ready);
    assert!(store.get("visited-pages").unwrap().is_none());
}

#[tokio::test]
async fn test_stale_result_does_not_overwrite_newer_location() {
    let config = AssistantConfig::from_toml_str(
        r#"
        [[catalog.rules]]
        context = "dashboard"
        resource = "dash-tour"

        [[catalog.rules]]
        context = "pricing"
        resource = "pricing-tour"
        "#,
    )
    .unwrap();
    let fetcher = LocatorTemplateFetcher::default();
    let mut session = AssistantSession::mount(&config, MemoryStore::new(), None).unwrap();

    let for_dashboard = session.location_changed("/dashboard").unwrap();
    let for_pricing = session.location_changed("/pricing").unwrap();

    // Dashboard's fetch lands after the visitor already moved on.
    let late = fulfil(&fetcher, for_dashboard).await;
    assert!(!session.complete(late));
    assert_eq!(session.status(), SessionStatus::Resolving);

    session.complete(fulfil(&fetcher, for_pricing).await);
    let view = session.view();
    assert_eq!(view.context.as_str(), "pricing");
    assert_eq!(view.locator.as_deref(), Some("/api/heygen/videos/pricing-tour"));
    assert!(!session.ledger().has_auto_presented("/dashboard"));
    assert!(session.ledger().has_auto_presented("/pricing"));
}

#[tokio::test]
async fn test_role_specific_content_through_events() {
    let config = AssistantConfig {
        locator_template: "https://media.example/{id}.mp4".to_string(),
        catalog: AssistantConfig::default()
            .catalog
            .with_rule(ContentRule::new("educator-welcome").for_role("educator")),
        ..AssistantConfig::default()
    };
    let fetcher = LocatorTemplateFetcher::from_config(&config);
    let mut session = AssistantSession::mount(
        &config,
        MemoryStore::new(),
        Some(Identity::with_role("TEACHER")),
    )
    .unwrap();

    let pending = session
        .handle(AssistantEvent::location("/"))
        .expect("root is unvisited");
    let completion = fulfil(&fetcher, pending).await;
    session.handle(AssistantEvent::ContentDelivered(completion));

    assert_eq!(
        session.view().locator.as_deref(),
        Some("https://media.example/educator-welcome.mp4")
    );
}

#[test]
fn test_opt_out_persists_across_sessions_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let config = AssistantConfig {
        storage_namespace: Some("avatar".to_string()),
        ..AssistantConfig::default()
    };

    let mut first =
        AssistantSession::mount(&config, FileStore::new(dir.path()), None).unwrap();
    first.toggle_auto_show();
    first.unmount();

    assert!(dir.path().join("avatar-auto-show-disabled.json").is_file());

    let mut second =
        AssistantSession::mount(&config, FileStore::new(dir.path()), None).unwrap();
    assert!(second.view().auto_show_disabled);
    assert!(second.location_changed("/help").is_none());
    assert!(second.location_changed("/credits").is_none());
    assert_eq!(second.status(), SessionStatus::Idle);
}

#[test]
fn test_unreadable_store_degrades_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("visited-pages.json"), "{{ corrupt").unwrap();

    let mut session = AssistantSession::mount(
        &AssistantConfig::default(),
        FileStore::new(dir.path()),
        None,
    )
    .unwrap();

    assert!(session.location_changed("/dashboard").is_some());
}
