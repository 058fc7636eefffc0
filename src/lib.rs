//! Five Points is a terminal dining concierge: five themed zones, each a
//! staff persona backed by a Gemini conversation.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the chat session: the zone registry, zone transitions, the
//!   conversation store, the single in-flight request and the completion
//!   capability, plus configuration and the action-driven app state.
//! - [`ui`] renders the terminal interface and runs the interactive event loop.
//! - [`api`] defines the Gemini `generateContent` payloads.
//! - [`cli`] parses arguments and dispatches to the UI or one-shot commands.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`].

pub mod api;
pub mod cli;
pub mod core;
pub mod logging;
pub mod ui;
pub mod utils;
