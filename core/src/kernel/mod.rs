pub mod gaussian;

pub use gaussian::{evaluate_gaussian, GaussianKernel, GaussianParams};
