//! Command-line front end for the `akg` binary.

pub mod commands;

pub use commands::CliContext;
