//! Terminal UI layer for interactive sessions.
//!
//! - [`chat_loop`]: the event loop that turns input into
//!   [`crate::core::app::AppAction`]s and runs completion and zone-commit tasks.
//! - [`renderer`]: frame composition (zone rail, header, conversation,
//!   suggestions, input).
//! - [`theme`]: styles derived from the active zone's accent color.
//!
//! This layer presents and captures interaction state; [`crate::core`] owns
//! the session rules.

pub mod chat_loop;
pub mod renderer;
pub mod theme;
