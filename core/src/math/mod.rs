pub mod matrix;
pub mod stats;

pub use matrix::MatrixHelper;
pub use stats::StatsHelper;
