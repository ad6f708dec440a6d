//! Filesystem-facing pieces: startup configuration.

pub mod config_io;

pub use config_io::{ConfigError, RosterConfig, read_config};
