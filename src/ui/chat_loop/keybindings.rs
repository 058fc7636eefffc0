//! Keybinding registry for the chat screen.
//!
//! Keys that edit text go straight to the input buffer; everything else is
//! looked up here and turned into [`AppAction`]s.

use crate::core::app::{App, AppAction, AppActionDispatcher};
use crate::core::zones::ZoneId;
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Result of handling a key event
#[derive(Debug, Clone, PartialEq)]
pub enum KeyResult {
    /// Key was handled; keep running
    Handled,
    /// Key was handled and the loop should stop
    Exit,
    /// No handler claimed the key
    NotHandled,
}

#[async_trait::async_trait]
pub trait KeyHandler: Send + Sync {
    async fn handle(
        &self,
        app: &Arc<Mutex<App>>,
        dispatcher: &AppActionDispatcher,
        key: &KeyEvent,
        term_height: u16,
    ) -> KeyResult;
}

/// Pattern for matching key events
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyPattern {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyPattern {
    pub fn simple(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }

    pub fn ctrl(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::CONTROL,
        }
    }

    pub fn alt(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::ALT,
        }
    }

    pub fn with_modifiers(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }
}

impl From<&KeyEvent> for KeyPattern {
    fn from(key: &KeyEvent) -> Self {
        Self {
            code: key.code,
            modifiers: key.modifiers,
        }
    }
}

/// Dispatches the action built by `build` from the current terminal height.
struct ActionHandler<F> {
    build: F,
}

#[async_trait::async_trait]
impl<F> KeyHandler for ActionHandler<F>
where
    F: Fn(u16) -> AppAction + Send + Sync,
{
    async fn handle(
        &self,
        _app: &Arc<Mutex<App>>,
        dispatcher: &AppActionDispatcher,
        _key: &KeyEvent,
        term_height: u16,
    ) -> KeyResult {
        dispatcher.dispatch((self.build)(term_height));
        KeyResult::Handled
    }
}

struct ExitHandler;

#[async_trait::async_trait]
impl KeyHandler for ExitHandler {
    async fn handle(
        &self,
        _app: &Arc<Mutex<App>>,
        dispatcher: &AppActionDispatcher,
        _key: &KeyEvent,
        _term_height: u16,
    ) -> KeyResult {
        dispatcher.dispatch(AppAction::RequestExit);
        KeyResult::Exit
    }
}

pub struct KeyRegistry {
    handlers: HashMap<KeyPattern, Box<dyn KeyHandler>>,
}

impl KeyRegistry {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    pub fn register(&mut self, pattern: KeyPattern, handler: Box<dyn KeyHandler>) {
        self.handlers.insert(pattern, handler);
    }

    fn register_action<F>(&mut self, pattern: KeyPattern, build: F)
    where
        F: Fn(u16) -> AppAction + Send + Sync + 'static,
    {
        self.register(pattern, Box::new(ActionHandler { build }));
    }

    pub fn is_bound(&self, key: &KeyEvent) -> bool {
        self.handlers.contains_key(&KeyPattern::from(key))
    }

    /// Keys the input buffer should receive directly.
    pub fn should_handle_as_text_input(&self, key: &KeyEvent) -> bool {
        if self.is_bound(key) || key.modifiers.contains(KeyModifiers::CONTROL) {
            return false;
        }
        matches!(
            key.code,
            KeyCode::Char(_)
                | KeyCode::Backspace
                | KeyCode::Delete
                | KeyCode::Left
                | KeyCode::Right
                | KeyCode::Home
                | KeyCode::End
        )
    }

    pub async fn handle_key_event(
        &self,
        app: &Arc<Mutex<App>>,
        dispatcher: &AppActionDispatcher,
        key: &KeyEvent,
        term_height: u16,
    ) -> KeyResult {
        match self.handlers.get(&KeyPattern::from(key)) {
            Some(handler) => handler.handle(app, dispatcher, key, term_height).await,
            None => KeyResult::NotHandled,
        }
    }
}

impl Default for KeyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn page_lines(term_height: u16) -> u16 {
    (term_height / 2).max(1)
}

pub fn build_registry() -> KeyRegistry {
    let mut registry = KeyRegistry::new();

    registry.register(KeyPattern::ctrl(KeyCode::Char('c')), Box::new(ExitHandler));
    registry.register_action(KeyPattern::simple(KeyCode::Enter), |_| {
        AppAction::SubmitInput
    });
    registry.register_action(KeyPattern::simple(KeyCode::Esc), |_| AppAction::ClearInput);

    registry.register_action(KeyPattern::simple(KeyCode::Tab), |_| {
        AppAction::SelectNextZone
    });
    // Terminals disagree on whether Shift+Tab carries the SHIFT modifier.
    registry.register_action(KeyPattern::simple(KeyCode::BackTab), |_| {
        AppAction::SelectPreviousZone
    });
    registry.register_action(
        KeyPattern::with_modifiers(KeyCode::BackTab, KeyModifiers::SHIFT),
        |_| AppAction::SelectPreviousZone,
    );

    for zone in ZoneId::ALL {
        let key = zone.index() as u8 + 1;
        registry.register_action(KeyPattern::simple(KeyCode::F(key)), move |_| {
            AppAction::SelectZone { zone }
        });
    }

    for index in 0..3usize {
        let digit = char::from(b'1' + index as u8);
        registry.register_action(KeyPattern::alt(KeyCode::Char(digit)), move |_| {
            AppAction::SubmitSuggestion { index }
        });
    }

    registry.register_action(KeyPattern::simple(KeyCode::Up), |_| AppAction::ScrollUp {
        lines: 1,
    });
    registry.register_action(KeyPattern::simple(KeyCode::Down), |_| {
        AppAction::ScrollDown { lines: 1 }
    });
    registry.register_action(KeyPattern::simple(KeyCode::PageUp), |height| {
        AppAction::ScrollUp {
            lines: page_lines(height),
        }
    });
    registry.register_action(KeyPattern::simple(KeyCode::PageDown), |height| {
        AppAction::ScrollDown {
            lines: page_lines(height),
        }
    });

    registry
}
