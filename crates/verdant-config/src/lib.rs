//! Configuration system for the Verdant world streamer.
//!
//! Provides runtime-configurable generation and streaming settings that
//! persist to disk as RON files. Supports CLI overrides via clap, hot-reload
//! detection, and forward/backward compatible serialization.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CONFIG_FILE, Config, DebugConfig, FloraConfig, NoiseConfig, StreamingConfig, WorldConfig,
};
pub use error::ConfigError;
