//! Lifecycle of a single user turn: guard, append, call, settle.

use tracing::{debug, warn};

use crate::core::completion::CompletionError;
use crate::core::conversation::ConversationStore;
use crate::core::message::Message;
use crate::core::zones::{ZoneId, ZonePersona};

/// Assistant text used when the capability succeeds with an empty reply.
pub const EMPTY_REPLY_PLACEHOLDER: &str = "I am processing your input...";

/// Assistant text used for every capability failure.
pub const FAILURE_APOLOGY: &str =
    "Our kitchen is experiencing high traffic. Please try again shortly.";

/// Identifies one submission and the conversation it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    pub id: u64,
    pub zone: ZoneId,
    pub epoch: u64,
}

/// Everything the completion capability needs for one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub ticket: RequestTicket,
    pub persona_instruction: String,
    pub new_message: String,
    /// Turns before `new_message`.
    pub history: Vec<Message>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement {
    /// The reply was appended to the conversation.
    Appended(Message),
    /// The conversation was reset while the request was in flight; the reply was dropped.
    Discarded(Message),
    /// The ticket does not match the request in flight.
    Unmatched,
}

#[derive(Debug, Default)]
pub struct RequestController {
    in_flight: Option<RequestTicket>,
    next_id: u64,
}

impl RequestController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn in_flight(&self) -> Option<RequestTicket> {
        self.in_flight
    }

    /// Starts a turn if `text` has content and nothing is in flight.
    ///
    /// On success the trimmed text is appended as a user message and the
    /// returned request carries the history as it was before that append.
    /// Rejected submissions leave every piece of state untouched.
    pub fn begin(
        &mut self,
        text: &str,
        persona: &ZonePersona,
        conversation: &mut ConversationStore,
    ) -> Option<CompletionRequest> {
        let trimmed = text.trim();
        if trimmed.is_empty() || self.is_in_flight() {
            return None;
        }

        let history = conversation.messages().to_vec();
        conversation.append(Message::user(trimmed));

        self.next_id += 1;
        let ticket = RequestTicket {
            id: self.next_id,
            zone: persona.id,
            epoch: conversation.epoch(),
        };
        self.in_flight = Some(ticket);
        debug!(request = ticket.id, zone = %ticket.zone, turns = history.len(), "request started");

        Some(CompletionRequest {
            ticket,
            persona_instruction: persona.prompt.clone(),
            new_message: trimmed.to_string(),
            history,
        })
    }

    /// Finishes the turn identified by `ticket`, always releasing the in-flight slot.
    pub fn settle(
        &mut self,
        ticket: RequestTicket,
        outcome: Result<String, CompletionError>,
        conversation: &mut ConversationStore,
    ) -> Settlement {
        if self.in_flight != Some(ticket) {
            debug!(
                request = ticket.id,
                "ignoring settlement for unknown request"
            );
            return Settlement::Unmatched;
        }
        self.in_flight = None;

        let reply = reply_message(outcome);
        if ticket.epoch != conversation.epoch() {
            debug!(
                request = ticket.id,
                zone = %ticket.zone,
                "conversation changed while request was in flight; dropping reply"
            );
            return Settlement::Discarded(reply);
        }

        conversation.append(reply.clone());
        Settlement::Appended(reply)
    }
}

/// Turns a capability outcome into the assistant message shown to the user.
pub fn reply_message(outcome: Result<String, CompletionError>) -> Message {
    match outcome {
        Ok(text) if text.is_empty() => Message::assistant(EMPTY_REPLY_PLACEHOLDER),
        Ok(text) => Message::assistant(text),
        Err(err) => {
            warn!(error = %err, "completion failed");
            Message::assistant(FAILURE_APOLOGY)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::zones::test_support::persona;

    fn begin(
        controller: &mut RequestController,
        store: &mut ConversationStore,
        text: &str,
    ) -> Option<CompletionRequest> {
        controller.begin(text, &persona(ZoneId::Learning), store)
    }

    #[test]
    fn blank_input_is_ignored() {
        let mut controller = RequestController::new();
        let mut store = ConversationStore::new();
        assert!(begin(&mut controller, &mut store, "").is_none());
        assert!(begin(&mut controller, &mut store, "   \n\t").is_none());
        assert!(store.is_empty());
        assert!(!controller.is_in_flight());
    }

    #[test]
    fn begin_appends_trimmed_user_turn_and_excludes_it_from_history() {
        let mut controller = RequestController::new();
        let mut store = ConversationStore::new();
        store.append(Message::user("earlier"));
        store.append(Message::assistant("reply"));

        let request = begin(&mut controller, &mut store, "  What origin is this?  ").unwrap();
        assert_eq!(request.new_message, "What origin is this?");
        assert_eq!(request.history.len(), 2);
        assert_eq!(request.persona_instruction, "You are the learning persona.");
        assert_eq!(
            store.messages().last(),
            Some(&Message::user("What origin is this?"))
        );
        assert!(controller.is_in_flight());
    }

    #[test]
    fn second_submission_while_in_flight_is_ignored() {
        let mut controller = RequestController::new();
        let mut store = ConversationStore::new();
        begin(&mut controller, &mut store, "first").unwrap();
        assert!(begin(&mut controller, &mut store, "second").is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn settle_appends_reply_and_releases_slot() {
        let mut controller = RequestController::new();
        let mut store = ConversationStore::new();
        let request = begin(&mut controller, &mut store, "hi").unwrap();
        let settlement = controller.settle(request.ticket, Ok("hello".into()), &mut store);
        assert_eq!(
            settlement,
            Settlement::Appended(Message::assistant("hello"))
        );
        assert_eq!(store.len(), 2);
        assert!(!controller.is_in_flight());
    }

    #[test]
    fn empty_reply_becomes_placeholder() {
        assert_eq!(
            reply_message(Ok(String::new())),
            Message::assistant(EMPTY_REPLY_PLACEHOLDER)
        );
    }

    #[test]
    fn failure_becomes_apology() {
        let reply = reply_message(Err(CompletionError::Api {
            status: 500,
            message: "boom".into(),
        }));
        assert_eq!(reply, Message::assistant(FAILURE_APOLOGY));
    }

    #[test]
    fn reply_for_reset_conversation_is_discarded_but_slot_released() {
        let mut controller = RequestController::new();
        let mut store = ConversationStore::new();
        let request = begin(&mut controller, &mut store, "hi").unwrap();
        store.reset();

        let settlement = controller.settle(request.ticket, Ok("late".into()), &mut store);
        assert_eq!(
            settlement,
            Settlement::Discarded(Message::assistant("late"))
        );
        assert!(store.is_empty());
        assert!(!controller.is_in_flight());
    }

    #[test]
    fn unknown_ticket_does_not_touch_state() {
        let mut controller = RequestController::new();
        let mut store = ConversationStore::new();
        let request = begin(&mut controller, &mut store, "hi").unwrap();
        let stale = RequestTicket {
            id: request.ticket.id + 7,
            ..request.ticket
        };
        assert_eq!(
            controller.settle(stale, Ok("x".into()), &mut store),
            Settlement::Unmatched
        );
        assert!(controller.is_in_flight());
        assert_eq!(store.len(), 1);
    }
}
