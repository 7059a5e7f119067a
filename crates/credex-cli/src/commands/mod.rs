//! CLI subcommands.

pub mod classify;
pub mod process;
