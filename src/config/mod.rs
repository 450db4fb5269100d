//! Configuration module
//!
//! TOML settings for display limits, the data directory, query thresholds
//! and logging.

pub mod config;

pub use config::Config;
