//! Subcommand implementations.

pub mod categorize;
pub mod config;
pub mod models;
