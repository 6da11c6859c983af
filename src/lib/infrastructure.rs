//! Adapters for the command line, configuration files and the Mailgun API

pub mod cli;
pub mod config;
pub mod content;
pub mod mailgun;
