pub mod app;
pub mod completion;
pub mod config;
pub mod conversation;
pub mod message;
pub mod request;
pub mod session;
pub mod text_wrapping;
pub mod transition;
pub mod zones;
