//! Chat surface logic and collaborator trait definitions for Mesa.
//!
//! This crate defines the "ports" (context, auth token, and transport traits)
//! that the infrastructure layer implements, plus the chat surface that drives
//! them. It depends only on `mesa-types` -- never on `mesa-infra` or any HTTP
//! crate.

pub mod chat;
