//! Main chat event loop
//!
//! Owns the terminal, reads input on a background task, applies actions to
//! the [`App`] serially and runs the resulting commands.

mod keybindings;
mod lifecycle;
mod tasks;

use self::keybindings::{build_registry, KeyRegistry, KeyResult};
use self::lifecycle::{restore_terminal, setup_terminal, ChatTerminal};
use self::tasks::TaskSpawner;

use crate::core::app::{apply_actions, App, AppAction, AppActionDispatcher};
use crate::core::completion::CompletionCapability;
use crate::core::session::ChatSession;
use crate::ui::renderer::ui;
use ratatui::crossterm::event::{self, Event, KeyEventKind, MouseEventKind};
use std::{
    error::Error,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

const MAX_FPS: u64 = 60;
const MOUSE_SCROLL_LINES: u16 = 3;

#[derive(Debug)]
pub enum UiEvent {
    Crossterm(Event),
    RequestRedraw,
}

/// Runs the interactive UI until the user quits.
pub async fn run_chat(
    session: ChatSession,
    capability: Arc<dyn CompletionCapability>,
) -> Result<(), Box<dyn Error>> {
    info!(zone = %session.active_zone(), "starting chat");
    let app = Arc::new(Mutex::new(App::new(session)));

    let mut terminal = setup_terminal()?;
    let result = run_event_loop(&app, &mut terminal, capability).await;
    restore_terminal(&mut terminal)?;
    result
}

async fn run_event_loop(
    app: &Arc<Mutex<App>>,
    terminal: &mut ChatTerminal,
    capability: Arc<dyn CompletionCapability>,
) -> Result<(), Box<dyn Error>> {
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<AppAction>();
    let dispatcher = AppActionDispatcher::new(action_tx);
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<UiEvent>();
    let spawner = TaskSpawner::new(capability, dispatcher.clone(), event_tx.clone());
    let registry = build_registry();

    let cancel = CancellationToken::new();
    let event_reader_handle = spawn_event_reader(event_tx, cancel.clone());

    let frame_duration = Duration::from_millis(1000 / MAX_FPS);
    let mut last_draw = Instant::now() - frame_duration;
    let mut request_redraw = true;

    let result = loop {
        if app.lock().await.ui.exit_requested {
            break Ok(());
        }

        if request_redraw && last_draw.elapsed() >= frame_duration {
            let mut app_guard = app.lock().await;
            if let Err(err) = terminal.draw(|f| ui(f, &mut app_guard)) {
                break Err(err.into());
            }
            last_draw = Instant::now();
            request_redraw = false;
        }

        let term_height = terminal.size().map(|size| size.height).unwrap_or_default();
        let outcome =
            process_ui_events(app, &mut event_rx, &registry, &dispatcher, term_height).await;
        if outcome.exit_requested {
            break Ok(());
        }

        let actions_applied = drain_action_queue(app, &spawner, &mut action_rx).await;
        request_redraw |= outcome.request_redraw || actions_applied;

        if !outcome.events_processed && !actions_applied && !request_redraw {
            tokio::time::sleep(Duration::from_millis(16)).await;
        }
    };

    cancel.cancel();
    let _ = event_reader_handle.await;
    debug!("event loop stopped");
    result
}

fn spawn_event_reader(
    event_tx: mpsc::UnboundedSender<UiEvent>,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while !cancel.is_cancelled() {
            // Short poll timeout keeps cancellation responsive.
            if let Ok(true) = event::poll(Duration::from_millis(10)) {
                match event::read() {
                    Ok(ev) => {
                        if event_tx.send(UiEvent::Crossterm(ev)).is_err() {
                            break;
                        }
                    }
                    Err(_) => continue,
                }
            } else {
                tokio::task::yield_now().await;
            }
        }
    })
}

struct EventProcessingOutcome {
    events_processed: bool,
    request_redraw: bool,
    exit_requested: bool,
}

async fn process_ui_events(
    app: &Arc<Mutex<App>>,
    event_rx: &mut mpsc::UnboundedReceiver<UiEvent>,
    registry: &KeyRegistry,
    dispatcher: &AppActionDispatcher,
    term_height: u16,
) -> EventProcessingOutcome {
    let mut outcome = EventProcessingOutcome {
        events_processed: false,
        request_redraw: false,
        exit_requested: false,
    };

    while let Ok(ev) = event_rx.try_recv() {
        outcome.events_processed = true;
        match ev {
            UiEvent::RequestRedraw | UiEvent::Crossterm(Event::Resize(..)) => {
                outcome.request_redraw = true;
            }
            UiEvent::Crossterm(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                if registry.should_handle_as_text_input(&key) {
                    let mut app_guard = app.lock().await;
                    app_guard.ui.apply_textarea_edit(|ta| {
                        ta.input(tui_textarea::Input::from(key));
                    });
                    outcome.request_redraw = true;
                    continue;
                }

                match registry
                    .handle_key_event(app, dispatcher, &key, term_height)
                    .await
                {
                    KeyResult::Exit => {
                        outcome.exit_requested = true;
                        break;
                    }
                    KeyResult::Handled => outcome.request_redraw = true,
                    KeyResult::NotHandled => {}
                }
            }
            UiEvent::Crossterm(Event::Paste(text)) => {
                let sanitized = sanitize_paste(&text);
                let mut app_guard = app.lock().await;
                app_guard.ui.apply_textarea_edit(|ta| {
                    ta.insert_str(&sanitized);
                });
                outcome.request_redraw = true;
            }
            UiEvent::Crossterm(Event::Mouse(mouse)) => match mouse.kind {
                MouseEventKind::ScrollUp => {
                    dispatcher.dispatch(AppAction::ScrollUp {
                        lines: MOUSE_SCROLL_LINES,
                    });
                }
                MouseEventKind::ScrollDown => {
                    dispatcher.dispatch(AppAction::ScrollDown {
                        lines: MOUSE_SCROLL_LINES,
                    });
                }
                _ => {}
            },
            UiEvent::Crossterm(_) => {}
        }
    }

    outcome
}

/// Single-line input: pasted newlines and tabs become spaces.
fn sanitize_paste(text: &str) -> String {
    text.replace("\r\n", " ")
        .chars()
        .map(|c| {
            if c == '\n' || c == '\r' || c == '\t' {
                ' '
            } else {
                c
            }
        })
        .filter(|c| !c.is_control())
        .collect()
}

async fn drain_action_queue(
    app: &Arc<Mutex<App>>,
    spawner: &TaskSpawner,
    action_rx: &mut mpsc::UnboundedReceiver<AppAction>,
) -> bool {
    let mut pending = Vec::new();
    while let Ok(action) = action_rx.try_recv() {
        pending.push(action);
    }

    if pending.is_empty() {
        return false;
    }

    let mut app_guard = app.lock().await;
    let commands = apply_actions(&mut app_guard, pending);
    drop(app_guard);
    for cmd in commands {
        spawner.execute(cmd);
    }
    true
}
