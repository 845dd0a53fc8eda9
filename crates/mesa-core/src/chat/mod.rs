//! The chat conversation surface and its building blocks.
//!
//! `surface::ChatSurface` is the entry point. The other modules are the
//! pieces it owns: bounded history, session ids, message formatting, the
//! progressive reveal, UI target traits, and the request/retry exchange.

pub mod exchange;
pub mod format;
pub mod history;
pub mod provider;
pub mod reveal;
pub mod session_id;
pub mod surface;
pub mod template;
pub mod view;
