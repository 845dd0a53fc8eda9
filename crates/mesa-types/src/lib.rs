//! Shared domain types for Mesa.
//!
//! This crate contains the types that flow between the chat surface, its
//! collaborators, and the HTTP layer: conversation entries, restaurant
//! context, wire payloads, auth sessions, client configuration, and errors.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod auth;
pub mod chat;
pub mod config;
pub mod error;
pub mod wire;
