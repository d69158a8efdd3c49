//! Conch shell: command-line client and reports for the Conch hardware inventory API.

pub mod api;
pub mod app;
pub mod commands;
pub mod config;
pub mod report;
