//! Configuration types and persistence.

pub mod persistence;
pub mod types;

pub use persistence::{default_config_path, load_config, peek_log_level, save_config};
pub use types::{Profile, ShellConfig};
