//! Interactive terminal chat against the dashboard backend.
//!
//! The chat loop drives a `ChatSurface` through its event channel and renders
//! it with the terminal targets in [`terminal`]. Entry point:
//! `loop_runner::run_chat_loop`.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;
pub mod terminal;
