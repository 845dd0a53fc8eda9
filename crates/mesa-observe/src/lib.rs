//! Logging and trace export setup for Mesa binaries.

pub mod tracing_setup;
