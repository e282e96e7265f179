//! # Worldgen Error Types
//!
//! Generation itself is total and never fails. The only fallible surface is
//! loading and validating configuration.

use thiserror::Error;

/// Errors that can occur while configuring world generation.
#[derive(Error, Debug)]
pub enum WorldgenError {
    /// Configuration parsed but describes an impossible world.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration text is not valid TOML for the expected schema.
    #[error("malformed configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// Configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for worldgen configuration.
pub type WorldgenResult<T> = Result<T, WorldgenError>;
