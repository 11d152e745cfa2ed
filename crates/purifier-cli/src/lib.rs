//! CLI library components for the contact list purifier.

pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
pub mod types;
