//! Numeric building blocks for signal and kernel computation.
//!
//! The crate bundles a brute-force lag estimator for time-aligning two
//! sampled signals, an isotropic 2D Gaussian kernel, a zero-phase
//! Butterworth low-pass filter and a handful of coordinate transforms.
//! Every operation is a synchronous, pure function over in-memory buffers.

pub mod geometry;
pub mod kernel;
pub mod math;
pub mod prelude;
pub mod signal;
pub mod telemetry;

pub use prelude::{NumericError, NumericResult};
