use super::{App, AppAction, AppCommand};
use crate::core::transition::SETTLE_DELAY;
use crate::core::zones::ZoneId;

pub(super) fn handle_zone_action(app: &mut App, action: AppAction) -> Option<AppCommand> {
    match action {
        AppAction::SelectZone { zone } => select(app, zone),
        AppAction::SelectNextZone => {
            let zone = selection_anchor(app).next();
            select(app, zone)
        }
        AppAction::SelectPreviousZone => {
            let zone = selection_anchor(app).previous();
            select(app, zone)
        }
        AppAction::CommitZone { ticket } => {
            app.session.commit_zone(ticket)?;
            let placeholder = app.active_persona().placeholder.clone();
            app.ui.reset_for_zone(&placeholder);
            None
        }
        _ => unreachable!("non-zone action routed to zone handler"),
    }
}

/// Cycling starts from the pending target so repeated Tab presses keep moving.
fn selection_anchor(app: &App) -> ZoneId {
    app.session
        .pending_zone()
        .unwrap_or_else(|| app.session.active_zone())
}

fn select(app: &mut App, zone: ZoneId) -> Option<AppCommand> {
    let ticket = app.session.select_zone(zone)?;
    Some(AppCommand::ScheduleZoneCommit {
        ticket,
        delay: SETTLE_DELAY,
    })
}
