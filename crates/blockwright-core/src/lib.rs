//! Shared foundation for the blockwright agent: environment-driven
//! configuration and tracing setup.

pub mod config;
pub mod observability;

pub use config::ConfigError;
