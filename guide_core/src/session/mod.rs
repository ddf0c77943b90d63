//! Assistant session - the state machine behind one mounted assistant.
//!
//! Lifecycle:
//! 1. **Mount**: load the visit ledger, start `Idle`
//! 2. **Location change**: resolve context and role; if the location has not
//!    auto-presented yet (and auto-show is on, and nothing is showing), start
//!    an automatic resolution
//! 3. **Open**: start a manual resolution regardless of the ledger
//! 4. **Completion**: apply the outcome if it still belongs to the current
//!    resolution, otherwise drop it
//! 5. **Unmount**: consume the session; late outcomes have nowhere to go
//!
//! `visible` and `muted` are orthogonal to the status and may change in any
//! state.

mod view;

pub use view::*;

use guide_rules::{AssistantConfig, ContextTable, ContextTag, Identity, RoleTable, RoleTag};
use tracing::{debug, info, warn};

use crate::events::AssistantEvent;
use crate::fetch::{Completion, ContentLocator, FetchTicket, PendingFetch};
use crate::ledger::VisitLedger;
use crate::resolver::{ContentRequest, ContentResolver};
use crate::storage::{KeyValueStore, StorageKeys};

/// A resolution awaiting its outcome, or the last one that failed.
#[derive(Debug, Clone)]
struct InFlight {
    ticket: FetchTicket,
    trigger: Trigger,
    /// Location the request was resolved for. Differs from `ticket.path`
    /// when a failed request is retried after the visitor moved.
    origin: Option<String>,
    request: ContentRequest,
}

/// One assistant instance, bound to one visitor profile's store.
#[derive(Debug)]
pub struct AssistantSession<S> {
    id: SessionId,
    contexts: ContextTable,
    roles: RoleTable,
    resolver: ContentResolver,
    auto_show_on_first_visit: bool,
    ledger: VisitLedger<S>,

    identity: Option<Identity>,
    path: Option<String>,
    current_context: ContextTag,
    current_role: RoleTag,

    status: SessionStatus,
    visible: bool,
    muted: bool,
    locator: Option<ContentLocator>,
    error_detail: Option<String>,

    generation: u64,
    in_flight: Option<InFlight>,
    /// The resolution that put the session in `Error`, re-issued on retry.
    failed: Option<InFlight>,
}

impl<S: KeyValueStore> AssistantSession<S> {
    /// Mount a session over `store` for the given visitor.
    pub fn mount(
        config: &AssistantConfig,
        store: S,
        identity: Option<Identity>,
    ) -> guide_rules::Result<Self> {
        config.validate()?;
        let contexts = config.context_table()?;
        let roles = config.role_table()?;
        let keys = StorageKeys::new(config.storage_namespace.as_deref());

        Ok(Self::from_parts(
            contexts,
            roles,
            ContentResolver::new(config.catalog.clone()),
            config.auto_show_on_first_visit,
            VisitLedger::load(store, keys),
            identity,
        ))
    }

    /// Mount with explicit tables and an already loaded ledger.
    pub fn from_parts(
        contexts: ContextTable,
        roles: RoleTable,
        resolver: ContentResolver,
        auto_show_on_first_visit: bool,
        ledger: VisitLedger<S>,
        identity: Option<Identity>,
    ) -> Self {
        let id = SessionId::new();
        let current_context = contexts.default_tag().clone();
        let current_role = roles.resolve(identity.as_ref());

        info!(
            session_id = %id,
            role = %current_role,
            auto_show_on_first_visit,
            auto_show_disabled = ledger.is_auto_show_disabled(),
            "assistant session mounted"
        );

        Self {
            id,
            contexts,
            roles,
            resolver,
            auto_show_on_first_visit,
            ledger,
            identity,
            path: None,
            current_context,
            current_role,
            status: SessionStatus::Idle,
            visible: false,
            muted: false,
            locator: None,
            error_detail: None,
            generation: 0,
            in_flight: None,
            failed: None,
        }
    }

    /// Dispatch an event to the matching command.
    ///
    /// Returns the fetch the host must run, if the event started a resolution.
    pub fn handle(&mut self, event: AssistantEvent) -> Option<PendingFetch> {
        debug!(
            session_id = %self.id,
            event = event.kind(),
            user_command = event.is_user_command(),
            status = %self.status,
            "handling event"
        );

        match event {
            AssistantEvent::LocationChanged { path } => self.location_changed(path),
            AssistantEvent::IdentityChanged { identity } => {
                self.set_identity(identity);
                None
            }
            AssistantEvent::OpenRequested => Some(self.open()),
            AssistantEvent::RetryRequested => self.retry(),
            AssistantEvent::DismissRequested => {
                self.dismiss();
                None
            }
            AssistantEvent::MuteToggled => {
                self.toggle_mute();
                None
            }
            AssistantEvent::AutoShowToggled => {
                self.toggle_auto_show();
                None
            }
            AssistantEvent::ContentDelivered(completion) => {
                self.complete(completion);
                None
            }
        }
    }

    /// React to navigation.
    ///
    /// A resolution still running for the previous location is abandoned;
    /// its outcome will be discarded when it arrives.
    pub fn location_changed(&mut self, path: impl Into<String>) -> Option<PendingFetch> {
        let path = path.into();
        if self.path.as_deref() == Some(path.as_str()) {
            return None;
        }

        self.current_context = self.contexts.resolve(&path);
        self.current_role = self.roles.resolve(self.identity.as_ref());
        debug!(
            session_id = %self.id,
            path = %path,
            context = %self.current_context,
            role = %self.current_role,
            "location changed"
        );
        self.path = Some(path);

        if let Some(abandoned) = self.in_flight.take() {
            debug!(
                session_id = %self.id,
                generation = abandoned.ticket.generation,
                "abandoning resolution for previous location"
            );
            self.status = SessionStatus::Idle;
            self.visible = false;
        }

        if self.should_auto_present() {
            Some(self.begin(Trigger::Automatic))
        } else {
            None
        }
    }

    /// Guard for the automatic path. Pure with respect to session state.
    pub fn should_auto_present(&self) -> bool {
        let Some(path) = self.path.as_deref() else {
            return false;
        };
        self.auto_show_on_first_visit
            && !self.visible
            && self.in_flight.is_none()
            && !self.ledger.is_auto_show_disabled()
            && !self.ledger.has_auto_presented(path)
    }

    /// Manual open: always starts a fresh resolution and shows the assistant.
    pub fn open(&mut self) -> PendingFetch {
        self.begin(Trigger::Manual)
    }

    /// Re-issue the failed request unchanged. Only meaningful in `Error`.
    ///
    /// If the visitor moved since the failure, the content still belongs to
    /// the original location and a success does not mark the new one.
    pub fn retry(&mut self) -> Option<PendingFetch> {
        let failed = match (&self.failed, self.status) {
            (Some(failed), SessionStatus::Error) => failed.clone(),
            _ => {
                debug!(session_id = %self.id, status = %self.status, "retry ignored outside error state");
                return None;
            }
        };
        Some(self.issue(failed.trigger, failed.origin, failed.request))
    }

    /// Hide the assistant. Content and error are kept until the next outcome.
    pub fn dismiss(&mut self) {
        self.visible = false;
        if matches!(self.status, SessionStatus::Ready | SessionStatus::Error) {
            self.status = SessionStatus::Idle;
        }
        debug!(session_id = %self.id, status = %self.status, "assistant dismissed");
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    /// Flip the persisted opt-out. Does not touch content state.
    pub fn toggle_auto_show(&mut self) {
        let disabled = !self.ledger.is_auto_show_disabled();
        self.ledger.set_auto_show_disabled(disabled);
        info!(session_id = %self.id, auto_show_disabled = disabled, "auto-show toggled");
    }

    /// Update the visitor identity. Takes effect on the next resolution.
    pub fn set_identity(&mut self, identity: Option<Identity>) {
        self.identity = identity;
        self.current_role = self.roles.resolve(self.identity.as_ref());
    }

    /// Apply the outcome of a fetch.
    ///
    /// Returns `false` if the outcome was stale (superseded by a newer
    /// resolution or a location change) and was discarded.
    pub fn complete(&mut self, completion: Completion) -> bool {
        let current = match &self.in_flight {
            Some(flight)
                if flight.ticket == completion.ticket
                    && completion.ticket.path == self.path =>
            {
                flight.clone()
            }
            _ => {
                warn!(
                    session_id = %self.id,
                    generation = completion.ticket.generation,
                    path = ?completion.ticket.path,
                    "discarding stale content outcome"
                );
                return false;
            }
        };
        self.in_flight = None;

        let outcome = completion.outcome.and_then(|locator| {
            if locator.is_empty() {
                Err(crate::error::FetchError::EmptyLocator)
            } else {
                Ok(locator)
            }
        });

        match outcome {
            Ok(locator) => {
                debug!(session_id = %self.id, locator = %locator, "content ready");
                self.status = SessionStatus::Ready;
                self.locator = Some(locator);
                self.error_detail = None;
                self.failed = None;

                if current.trigger == Trigger::Automatic {
                    match current.origin.as_deref() {
                        Some(path) if current.origin == self.path => {
                            self.ledger.mark_auto_presented(path);
                            info!(session_id = %self.id, path, "auto-presented guidance");
                        }
                        origin => debug!(
                            session_id = %self.id,
                            ?origin,
                            "retried content belongs to a previous location, not marking"
                        ),
                    }
                    self.visible = true;
                }
            }
            Err(e) => {
                warn!(session_id = %self.id, error = %e, "content resolution failed");
                self.status = SessionStatus::Error;
                self.error_detail = Some(e.to_string());
                self.failed = Some(current);
                self.visible = true;
            }
        }
        true
    }

    /// Tear the session down, handing the store back.
    pub fn unmount(self) -> S {
        if let Some(flight) = &self.in_flight {
            debug!(
                session_id = %self.id,
                generation = flight.ticket.generation,
                "unmounting with resolution in flight"
            );
        }
        info!(session_id = %self.id, "assistant session unmounted");
        self.ledger.into_store()
    }

    fn begin(&mut self, trigger: Trigger) -> PendingFetch {
        let request = self
            .resolver
            .resolve(&self.current_context, &self.current_role);
        self.issue(trigger, self.path.clone(), request)
    }

    fn issue(
        &mut self,
        trigger: Trigger,
        origin: Option<String>,
        request: ContentRequest,
    ) -> PendingFetch {
        self.generation += 1;
        let ticket = FetchTicket {
            generation: self.generation,
            path: self.path.clone(),
        };

        debug!(
            session_id = %self.id,
            generation = self.generation,
            ?trigger,
            context = %request.context,
            role = %request.role,
            resource = %request.resource_id,
            "resolving content"
        );

        self.in_flight = Some(InFlight {
            ticket: ticket.clone(),
            trigger,
            origin,
            request: request.clone(),
        });
        self.status = SessionStatus::Resolving;
        if trigger == Trigger::Manual {
            self.visible = true;
        }

        PendingFetch { ticket, request }
    }

    pub fn view(&self) -> AssistantView {
        AssistantView {
            status: self.status,
            visible: self.visible,
            muted: self.muted,
            auto_show_disabled: self.ledger.is_auto_show_disabled(),
            context: self.current_context.clone(),
            role: self.current_role.clone(),
            locator: match self.status {
                SessionStatus::Ready => self.locator.as_ref().map(|l| l.0.clone()),
                _ => None,
            },
            error_message: match self.status {
                SessionStatus::Error => Some(RESOLUTION_FAILED_MESSAGE.to_string()),
                _ => None,
            },
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn current_context(&self) -> &ContextTag {
        &self.current_context
    }

    pub fn current_role(&self) -> &RoleTag {
        &self.current_role
    }

    /// Last delivered locator, kept across dismissal.
    pub fn content_locator(&self) -> Option<&ContentLocator> {
        self.locator.as_ref()
    }

    /// Underlying cause of the last failure, kept across dismissal.
    pub fn error_detail(&self) -> Option<&str> {
        self.error_detail.as_deref()
    }

    pub fn ledger(&self) -> &VisitLedger<S> {
        &self.ledger
    }
}
