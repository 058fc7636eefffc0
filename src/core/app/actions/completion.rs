use super::{App, AppCommand};
use crate::core::completion::CompletionError;
use crate::core::request::{RequestTicket, Settlement};

pub(super) fn handle_settlement(
    app: &mut App,
    ticket: RequestTicket,
    outcome: Result<String, CompletionError>,
) -> Option<AppCommand> {
    if let Settlement::Appended(_) = app.session.settle(ticket, outcome) {
        app.ui.scroll_to_bottom();
    }
    None
}
