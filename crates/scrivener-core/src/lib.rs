//! Shared configuration, error and logging plumbing for the Scrivener crates.

pub mod config;
pub mod error;
pub mod logging;
