#[cfg(test)]
use crate::core::app::App;
#[cfg(test)]
use crate::core::completion::{CompletionCapability, CompletionError};
#[cfg(test)]
use crate::core::message::Message;
#[cfg(test)]
use crate::core::session::ChatSession;
#[cfg(test)]
use crate::core::zones::{ZoneId, ZoneRegistry};
#[cfg(test)]
use std::collections::VecDeque;
#[cfg(test)]
use std::sync::{Arc, Mutex};

#[cfg(test)]
pub fn builtin_registry() -> Arc<ZoneRegistry> {
    Arc::new(ZoneRegistry::builtin().expect("builtin zones parse"))
}

#[cfg(test)]
pub fn create_test_session(zone: ZoneId) -> ChatSession {
    ChatSession::new(builtin_registry(), zone)
}

#[cfg(test)]
pub fn create_test_app() -> App {
    App::new(create_test_session(ZoneId::Observation))
}

/// Arguments of one `generate` call as seen by [`ScriptedCompletion`].
#[cfg(test)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub persona_instruction: String,
    pub new_message: String,
    pub history: Vec<Message>,
}

/// Completion capability that replays queued outcomes and records every call.
#[cfg(test)]
#[derive(Default)]
pub struct ScriptedCompletion {
    outcomes: Mutex<VecDeque<Result<String, CompletionError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

#[cfg(test)]
impl ScriptedCompletion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replying<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let scripted = Self::new();
        for reply in replies {
            scripted.push(Ok(reply.into()));
        }
        scripted
    }

    pub fn push(&self, outcome: Result<String, CompletionError>) {
        self.outcomes.lock().unwrap().push_back(outcome);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait::async_trait]
impl CompletionCapability for ScriptedCompletion {
    async fn generate(
        &self,
        persona_instruction: &str,
        new_message: &str,
        history: &[Message],
    ) -> Result<String, CompletionError> {
        self.calls.lock().unwrap().push(RecordedCall {
            persona_instruction: persona_instruction.to_string(),
            new_message: new_message.to_string(),
            history: history.to_vec(),
        });
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(format!("echo: {new_message}")))
    }
}
