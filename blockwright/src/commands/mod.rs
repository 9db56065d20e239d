//! Subcommand implementations.

pub mod run;
pub mod tools;
pub mod world_state;
