//! Error types for tagver-core.
//!
//! Each engine module defines its own error next to the code that raises it
//! ([`GitError`](crate::git::GitError), [`BumpError`](crate::bump::BumpError),
//! ...). Configuration errors live here.

use thiserror::Error;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read or deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;
