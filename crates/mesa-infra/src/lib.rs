//! Infrastructure layer for Mesa.
//!
//! Contains implementations of the collaborator traits defined in `mesa-core`:
//! the reqwest chat transport, token providers backed by the dashboard login
//! and the hosted auth service, plus config and data-directory resolution.

pub mod auth;
pub mod config;
pub mod filesystem;
pub mod jwt;
pub mod transport;
