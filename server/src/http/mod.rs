pub mod bridge;
pub mod metrics;
pub mod model;
