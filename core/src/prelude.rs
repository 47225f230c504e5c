//! Shared error type and re-exports used across the numeric modules.

pub use crate::kernel::{evaluate_gaussian, GaussianKernel, GaussianParams};
pub use crate::signal::{align, lowpass, Alignment, Butterworth, FilterDesign, FilterParams};
pub use crate::signal::{LowPassFilter, TransferFunction};

/// Common error type for the numeric utilities.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum NumericError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("empty input: {0}")]
    EmptyInput(String),
    #[error("internal failure: {0}")]
    Internal(String),
}

pub type NumericResult<T> = Result<T, NumericError>;
