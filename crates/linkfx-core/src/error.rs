//! Error types for the connector engine.
//!
//! Nothing here is fatal: dispatch turns a [`SurfaceError`] into a fallback to
//! the host's own link drawing, and configuration errors are reported back to
//! whoever tried to change the setting.

use thiserror::Error;

/// A drawing call failed on the backing surface.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SurfaceError {
    /// The canvas rejected the call (the message is the host's exception text).
    #[error("canvas call failed: {0}")]
    Canvas(String),
    /// The surface does not implement the requested primitive.
    #[error("surface does not support {0}")]
    Unsupported(&'static str),
}

/// Configuration value could not be parsed or is out of range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown animation mode {0:?} (expected static, full or selected)")]
    UnknownMode(String),
    #[error("unknown effect {0:?}")]
    UnknownEffect(String),
    #[error("effect index {0} out of range")]
    EffectIndex(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("invalid color {0:?}")]
    Invalid(String),
}

pub type SurfaceResult<T> = Result<T, SurfaceError>;
