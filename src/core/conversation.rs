use crate::core::message::Message;

/// Ordered, append-only history for the active zone.
///
/// Every [`reset`](ConversationStore::reset) starts a new epoch. Requests are
/// tagged with the epoch they were submitted in so a reply that outlives its
/// conversation can be recognised and dropped.
#[derive(Debug, Default)]
pub struct ConversationStore {
    messages: Vec<Message>,
    epoch: u64,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.messages.clear();
        self.epoch += 1;
    }

    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}
