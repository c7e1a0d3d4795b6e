//! Expose the dossier CLI internals for integration tests and benchmarks.
pub mod cli;
pub mod commands;
