use super::{App, AppAction, AppCommand};

pub(super) fn handle_input_action(app: &mut App, action: AppAction) -> Option<AppCommand> {
    match action {
        AppAction::SubmitInput => {
            let text = app.ui.input_text();
            let command = submit(app, &text);
            if command.is_some() {
                app.ui.clear_input();
            }
            command
        }
        AppAction::SubmitSuggestion { index } => {
            let suggestion = app.active_persona().suggested_prompts.get(index).cloned()?;
            submit(app, &suggestion)
        }
        AppAction::ClearInput => {
            app.ui.clear_input();
            None
        }
        AppAction::ScrollUp { lines } => {
            app.ui.scroll_up(lines);
            None
        }
        AppAction::ScrollDown { lines } => {
            app.ui.scroll_down(lines);
            None
        }
        AppAction::RequestExit => {
            app.ui.exit_requested = true;
            None
        }
        _ => unreachable!("non-input action routed to input handler"),
    }
}

/// Starts a turn unless a zone change is pending or the session guard rejects it.
fn submit(app: &mut App, text: &str) -> Option<AppCommand> {
    if !app.accepts_submissions() {
        return None;
    }
    let request = app.session.begin_submit(text)?;
    app.ui.scroll_to_bottom();
    Some(AppCommand::SpawnCompletion(request))
}
