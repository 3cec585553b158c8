//! Error types for configuration loading and panel setup.
//!
//! The scroll engine itself never fails: malformed wheel input is treated as
//! a zero delta and a viewport without overflow reports zero progress. The
//! only fallible surface is building a [`Config`](crate::config::Config) or
//! laying out panels from user-supplied values.

use thiserror::Error;

/// Errors produced while loading or validating configuration.
#[derive(Error, Debug)]
pub enum Error {
    /// Reading a configuration file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration document could not be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The wheel delta multiplier must be finite and positive.
    #[error("delta multiplier must be finite and greater than zero, got {0}")]
    InvalidMultiplier(f64),

    /// The per-notch wheel delta must be finite and positive.
    #[error("wheel line delta must be finite and greater than zero, got {0}")]
    InvalidWheelDelta(f64),

    /// A fractional panel width must be finite and positive.
    #[error("panel width fraction must be finite and greater than zero, got {0}")]
    InvalidPanelWidth(f64),
}

/// Result alias used by fallible configuration APIs.
pub type Result<T> = std::result::Result<T, Error>;
