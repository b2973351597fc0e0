//! Errors raised while persisting the world's `config.ron`.

use std::path::PathBuf;

/// Failure to read, parse, or write the world configuration file.
///
/// File-level variants carry the path they were operating on.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `config.ron` exists but could not be read.
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config directory or file could not be written.
    #[error("cannot write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not a valid RON world configuration.
    #[error("{} is not a valid world config: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },

    /// The in-memory configuration could not be rendered as RON.
    #[error("cannot serialize world config: {0}")]
    Serialize(#[source] ron::Error),
}
