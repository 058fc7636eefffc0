//! Background work spawned on behalf of [`AppCommand`]s.
//!
//! Tasks never touch the app directly; they report back by dispatching an
//! action and nudging the loop to redraw.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::core::app::{AppAction, AppActionDispatcher, AppCommand};
use crate::core::completion::{CompletionCapability, CompletionError};
use crate::core::request::CompletionRequest;
use crate::core::transition::TransitionTicket;
use crate::ui::chat_loop::UiEvent;

#[derive(Clone)]
pub struct TaskSpawner {
    capability: Arc<dyn CompletionCapability>,
    dispatcher: AppActionDispatcher,
    event_tx: mpsc::UnboundedSender<UiEvent>,
}

impl TaskSpawner {
    pub fn new(
        capability: Arc<dyn CompletionCapability>,
        dispatcher: AppActionDispatcher,
        event_tx: mpsc::UnboundedSender<UiEvent>,
    ) -> Self {
        Self {
            capability,
            dispatcher,
            event_tx,
        }
    }

    pub fn execute(&self, command: AppCommand) {
        match command {
            AppCommand::SpawnCompletion(request) => self.spawn_completion(request),
            AppCommand::ScheduleZoneCommit { ticket, delay } => {
                self.schedule_zone_commit(ticket, delay)
            }
        }
    }

    fn spawn_completion(&self, request: CompletionRequest) {
        let capability = Arc::clone(&self.capability);
        let dispatcher = self.dispatcher.clone();
        let event_tx = self.event_tx.clone();
        tokio::spawn(async move {
            let CompletionRequest {
                ticket,
                persona_instruction,
                new_message,
                history,
            } = request;

            // A panic inside `generate` still settles the request.
            let call = tokio::spawn(async move {
                capability
                    .generate(&persona_instruction, &new_message, &history)
                    .await
            });
            let outcome = match call.await {
                Ok(outcome) => outcome,
                Err(err) => {
                    warn!(request = ticket.id, error = %err, "completion task failed");
                    Err(CompletionError::Aborted(err.to_string()))
                }
            };
            debug!(
                request = ticket.id,
                ok = outcome.is_ok(),
                "completion finished"
            );

            dispatcher.dispatch(AppAction::CompletionSettled { ticket, outcome });
            let _ = event_tx.send(UiEvent::RequestRedraw);
        });
    }

    fn schedule_zone_commit(&self, ticket: TransitionTicket, delay: Duration) {
        let dispatcher = self.dispatcher.clone();
        let event_tx = self.event_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            dispatcher.dispatch(AppAction::CommitZone { ticket });
            let _ = event_tx.send(UiEvent::RequestRedraw);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::app::apply_action;
    use crate::core::message::Message;
    use crate::core::request::{RequestTicket, FAILURE_APOLOGY};
    use crate::core::zones::ZoneId;
    use crate::utils::test_utils::{create_test_app, ScriptedCompletion};

    struct PanickingCompletion;

    #[async_trait::async_trait]
    impl CompletionCapability for PanickingCompletion {
        async fn generate(
            &self,
            _persona_instruction: &str,
            _new_message: &str,
            _history: &[Message],
        ) -> Result<String, CompletionError> {
            panic!("provider bug");
        }
    }

    fn spawner(
        capability: Arc<ScriptedCompletion>,
    ) -> (
        TaskSpawner,
        mpsc::UnboundedReceiver<AppAction>,
        mpsc::UnboundedReceiver<UiEvent>,
    ) {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let spawner = TaskSpawner::new(capability, AppActionDispatcher::new(action_tx), event_tx);
        (spawner, action_rx, event_rx)
    }

    #[tokio::test]
    async fn completion_result_comes_back_as_settlement_action() {
        let capability = Arc::new(ScriptedCompletion::replying(["Four fifty."]));
        let (spawner, mut actions, mut events) = spawner(Arc::clone(&capability));
        let ticket = RequestTicket {
            id: 7,
            zone: ZoneId::Observation,
            epoch: 0,
        };

        spawner.execute(AppCommand::SpawnCompletion(CompletionRequest {
            ticket,
            persona_instruction: "You are the Head Chef.".into(),
            new_message: "How hot?".into(),
            history: Vec::new(),
        }));

        match actions.recv().await {
            Some(AppAction::CompletionSettled {
                ticket: settled,
                outcome,
            }) => {
                assert_eq!(settled, ticket);
                assert_eq!(outcome.unwrap(), "Four fifty.");
            }
            other => panic!("unexpected action: {other:?}"),
        }
        assert!(matches!(events.recv().await, Some(UiEvent::RequestRedraw)));
        assert_eq!(capability.calls()[0].new_message, "How hot?");
    }

    #[tokio::test]
    async fn panicking_capability_still_releases_the_in_flight_slot() {
        let (action_tx, mut actions) = mpsc::unbounded_channel();
        let (event_tx, _events) = mpsc::unbounded_channel();
        let spawner = TaskSpawner::new(
            Arc::new(PanickingCompletion),
            AppActionDispatcher::new(action_tx),
            event_tx,
        );
        let mut app = create_test_app();
        app.ui.apply_textarea_edit(|ta| {
            ta.insert_str("hi");
        });

        let command = apply_action(&mut app, AppAction::SubmitInput).expect("submit spawns");
        spawner.execute(command);

        let settled = tokio::time::timeout(Duration::from_secs(5), actions.recv())
            .await
            .expect("settlement arrives")
            .expect("channel open");
        match &settled {
            AppAction::CompletionSettled { outcome, .. } => {
                assert!(matches!(outcome, Err(CompletionError::Aborted(_))));
            }
            other => panic!("unexpected action: {other:?}"),
        }
        apply_action(&mut app, settled);

        assert!(!app.session.is_in_flight());
        assert_eq!(
            app.session.messages(),
            &[Message::user("hi"), Message::assistant(FAILURE_APOLOGY)]
        );
        assert!(app.session.begin_submit("again").is_some());
    }

    #[tokio::test]
    async fn zone_commit_is_dispatched_after_the_delay() {
        let (spawner, mut actions, _events) = spawner(Arc::new(ScriptedCompletion::new()));
        let ticket = TransitionTicket {
            target: ZoneId::Learning,
            generation: 3,
        };
        let started = std::time::Instant::now();

        spawner.execute(AppCommand::ScheduleZoneCommit {
            ticket,
            delay: Duration::from_millis(20),
        });

        match actions.recv().await {
            Some(AppAction::CommitZone { ticket: committed }) => assert_eq!(committed, ticket),
            other => panic!("unexpected action: {other:?}"),
        }
        assert!(started.elapsed() >= Duration::from_millis(20));
    }
}
