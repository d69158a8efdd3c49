//! Application plumbing: CLI definition, logging setup, output helpers.

pub mod cli;
pub mod logging;
pub mod output;
