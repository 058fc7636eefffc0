//! TUI-less "say" command

use std::error::Error;

use crate::core::completion::CompletionCapability;
use crate::core::request::Settlement;
use crate::core::session::ChatSession;

/// Runs a single turn in `session` and returns the assistant text to print.
///
/// Returns `None` when the prompt is blank.
pub async fn say_once(
    session: &mut ChatSession,
    prompt: &[String],
    capability: &dyn CompletionCapability,
) -> Option<String> {
    let prompt = prompt.join(" ");
    match session.submit(&prompt, capability).await? {
        Settlement::Appended(message) | Settlement::Discarded(message) => Some(message.content),
        Settlement::Unmatched => None,
    }
}

pub async fn run_say(
    mut session: ChatSession,
    prompt: Vec<String>,
    capability: &dyn CompletionCapability,
) -> Result<(), Box<dyn Error>> {
    match say_once(&mut session, &prompt, capability).await {
        Some(reply) => {
            println!("{reply}");
            Ok(())
        }
        None => {
            eprintln!("Usage: fivepoints say [-z ZONE] <prompt>");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::zones::ZoneId;
    use crate::utils::test_utils::{create_test_session, ScriptedCompletion};

    #[tokio::test]
    async fn joins_words_and_returns_reply() {
        let mut session = create_test_session(ZoneId::Learning);
        let capability = ScriptedCompletion::replying(["Ethiopian Yirgacheffe."]);
        let prompt: Vec<String> = ["What", "origin", "is", "this?"]
            .iter()
            .map(|word| word.to_string())
            .collect();

        let reply = say_once(&mut session, &prompt, &capability).await;

        assert_eq!(reply.as_deref(), Some("Ethiopian Yirgacheffe."));
        let call = &capability.calls()[0];
        assert_eq!(call.new_message, "What origin is this?");
        assert_eq!(call.persona_instruction, session.active_persona().prompt);
    }

    #[tokio::test]
    async fn blank_prompt_returns_none() {
        let mut session = create_test_session(ZoneId::Observation);
        let capability = ScriptedCompletion::new();
        let reply = say_once(&mut session, &[" ".to_string()], &capability).await;
        assert_eq!(reply, None);
        assert!(capability.calls().is_empty());
    }
}
