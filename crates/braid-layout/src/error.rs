//! Error types for layout configuration.
//!
//! Layout itself never fails; only loading a [`crate::LayoutConfig`] can.

use thiserror::Error;

/// Errors that can occur while loading or validating a layout config.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config text is not valid RON for [`crate::LayoutConfig`].
    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),

    /// Parsed but unusable, e.g. a zero ceiling.
    #[error("invalid layout config: {0}")]
    Invalid(String),
}
