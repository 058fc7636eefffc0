//! Interactive application state: the chat session plus UI-only state.
//!
//! All mutation goes through [`apply_action`]; side effects come back out as
//! [`AppCommand`]s for the event loop to execute.

use crate::core::session::ChatSession;
use crate::core::zones::ZonePersona;

pub mod actions;
pub mod ui_state;

pub use actions::{apply_action, apply_actions, AppAction, AppActionDispatcher, AppCommand};
pub use ui_state::UiState;

pub struct App {
    pub session: ChatSession,
    pub ui: UiState,
}

impl App {
    pub fn new(session: ChatSession) -> Self {
        let ui = UiState::new(&session.active_persona().placeholder);
        Self { session, ui }
    }

    pub fn active_persona(&self) -> &ZonePersona {
        self.session.active_persona()
    }

    /// Whether the main panel should be drawn dimmed.
    pub fn is_dimmed(&self) -> bool {
        self.session.is_transitioning()
    }

    /// Submissions are gated while a zone change is settling.
    pub fn accepts_submissions(&self) -> bool {
        !self.session.is_transitioning()
    }
}
