//! One chat session: the active zone, its conversation, and the request in flight.
//!
//! A session is created per UI run and passed around explicitly. It owns the
//! conversation store outright; nothing else mutates the history.

use std::sync::Arc;

use tracing::info;

use crate::core::completion::{CompletionCapability, CompletionError};
use crate::core::conversation::ConversationStore;
use crate::core::message::Message;
use crate::core::request::{CompletionRequest, RequestController, RequestTicket, Settlement};
use crate::core::transition::{TransitionTicket, ZoneTransitionController};
use crate::core::zones::{ZoneId, ZonePersona, ZoneRegistry};

pub struct ChatSession {
    registry: Arc<ZoneRegistry>,
    transitions: ZoneTransitionController,
    conversation: ConversationStore,
    requests: RequestController,
}

impl ChatSession {
    pub fn new(registry: Arc<ZoneRegistry>, initial_zone: ZoneId) -> Self {
        Self {
            registry,
            transitions: ZoneTransitionController::new(initial_zone),
            conversation: ConversationStore::new(),
            requests: RequestController::new(),
        }
    }

    pub fn registry(&self) -> &ZoneRegistry {
        &self.registry
    }

    pub fn active_zone(&self) -> ZoneId {
        self.transitions.active()
    }

    pub fn active_persona(&self) -> &ZonePersona {
        self.registry.get(self.active_zone())
    }

    pub fn is_transitioning(&self) -> bool {
        self.transitions.is_transitioning()
    }

    pub fn pending_zone(&self) -> Option<ZoneId> {
        self.transitions.pending_target()
    }

    pub fn messages(&self) -> &[Message] {
        self.conversation.messages()
    }

    pub fn is_in_flight(&self) -> bool {
        self.requests.is_in_flight()
    }

    /// See [`ZoneTransitionController::select_zone`].
    pub fn select_zone(&mut self, zone: ZoneId) -> Option<TransitionTicket> {
        self.transitions.select_zone(zone)
    }

    /// Applies a settled transition; the conversation restarts empty for the new zone.
    pub fn commit_zone(&mut self, ticket: TransitionTicket) -> Option<ZoneId> {
        let zone = self.transitions.commit(ticket)?;
        self.conversation.reset();
        info!(zone = %zone, "zone changed");
        Some(zone)
    }

    /// Guarded first half of a submission; see [`RequestController::begin`].
    pub fn begin_submit(&mut self, text: &str) -> Option<CompletionRequest> {
        let persona = self.registry.get(self.transitions.active());
        self.requests.begin(text, persona, &mut self.conversation)
    }

    pub fn settle(
        &mut self,
        ticket: RequestTicket,
        outcome: Result<String, CompletionError>,
    ) -> Settlement {
        self.requests.settle(ticket, outcome, &mut self.conversation)
    }

    /// Runs a whole turn against `capability`. Returns `None` when the guard rejected `text`.
    pub async fn submit(
        &mut self,
        text: &str,
        capability: &dyn CompletionCapability,
    ) -> Option<Settlement> {
        let request = self.begin_submit(text)?;
        let outcome = capability
            .generate(
                &request.persona_instruction,
                &request.new_message,
                &request.history,
            )
            .await;
        Some(self.settle(request.ticket, outcome))
    }
}
