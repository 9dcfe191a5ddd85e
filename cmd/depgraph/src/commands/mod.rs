//! Subcommand implementations.

pub mod map;
