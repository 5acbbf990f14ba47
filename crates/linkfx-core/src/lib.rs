//! Curve sampling, rope physics and animated effects for node-graph connectors.
//!
//! Platform-free: the web frontend supplies a canvas-backed [`Surface`] and the
//! host's selection, the native harness a [`Recorder`].

pub mod clock;
pub mod color;
pub mod config;
pub mod constants;
pub mod curve;
pub mod dispatch;
pub mod effects;
pub mod error;
pub mod rope;
pub mod surface;

pub use clock::*;
pub use color::*;
pub use config::*;
pub use constants::*;
pub use curve::*;
pub use dispatch::*;
pub use effects::CurveEffect;
pub use error::*;
pub use rope::*;
pub use surface::*;
