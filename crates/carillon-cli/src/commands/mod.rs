//! CLI subcommand implementations.

pub mod devices;
pub mod listen;
pub mod scan;
