mod completion;
mod input;
mod zone;

use std::time::Duration;

use tokio::sync::mpsc;

use super::App;
use crate::core::completion::CompletionError;
use crate::core::request::{CompletionRequest, RequestTicket};
use crate::core::transition::TransitionTicket;
use crate::core::zones::ZoneId;

#[derive(Debug)]
pub enum AppAction {
    SubmitInput,
    SubmitSuggestion {
        index: usize,
    },
    SelectZone {
        zone: ZoneId,
    },
    SelectNextZone,
    SelectPreviousZone,
    CommitZone {
        ticket: TransitionTicket,
    },
    CompletionSettled {
        ticket: RequestTicket,
        outcome: Result<String, CompletionError>,
    },
    ClearInput,
    ScrollUp {
        lines: u16,
    },
    ScrollDown {
        lines: u16,
    },
    RequestExit,
}

#[derive(Clone)]
pub struct AppActionDispatcher {
    tx: mpsc::UnboundedSender<AppAction>,
}

impl AppActionDispatcher {
    pub fn new(tx: mpsc::UnboundedSender<AppAction>) -> Self {
        Self { tx }
    }

    pub fn dispatch(&self, action: AppAction) {
        let _ = self.tx.send(action);
    }
}

/// Side effects requested by an action, executed by the event loop.
#[derive(Debug)]
pub enum AppCommand {
    SpawnCompletion(CompletionRequest),
    ScheduleZoneCommit {
        ticket: TransitionTicket,
        delay: Duration,
    },
}

pub fn apply_actions(
    app: &mut App,
    actions: impl IntoIterator<Item = AppAction>,
) -> Vec<AppCommand> {
    let mut commands = Vec::new();
    for action in actions {
        if let Some(cmd) = apply_action(app, action) {
            commands.push(cmd);
        }
    }
    commands
}

pub fn apply_action(app: &mut App, action: AppAction) -> Option<AppCommand> {
    match action {
        AppAction::SubmitInput
        | AppAction::SubmitSuggestion { .. }
        | AppAction::ClearInput
        | AppAction::ScrollUp { .. }
        | AppAction::ScrollDown { .. }
        | AppAction::RequestExit => input::handle_input_action(app, action),

        AppAction::SelectZone { .. }
        | AppAction::SelectNextZone
        | AppAction::SelectPreviousZone
        | AppAction::CommitZone { .. } => zone::handle_zone_action(app, action),

        AppAction::CompletionSettled { ticket, outcome } => {
            completion::handle_settlement(app, ticket, outcome)
        }
    }
}
