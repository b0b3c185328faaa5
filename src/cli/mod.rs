//! CLI-specific functionality for the NULLBOTS site client
//!
//! This module contains argument parsing and configuration discovery.

pub mod args;
pub mod config;

pub use args::{Args, Commands, NewsletterCommand, ProjectsCommand, SessionCommand};
pub use config::{ConfigCandidate, ConfigDiscovery, ConfigError, ConfigScope};
