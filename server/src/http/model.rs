use cxnmath::kernel::GaussianParams;
use cxnmath::signal::FilterParams;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlignRequest {
    pub a: Vec<f64>,
    pub b: Vec<f64>,
    #[serde(default)]
    pub max_lag: Option<isize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LowpassRequest {
    pub data: Vec<f64>,
    #[serde(default)]
    pub cutoff: Option<f64>,
    #[serde(default)]
    pub sampling_rate: Option<f64>,
    #[serde(default)]
    pub order: Option<usize>,
}

impl LowpassRequest {
    /// Fields left out of the request fall back to `defaults`.
    pub fn params(&self, defaults: FilterParams) -> FilterParams {
        FilterParams {
            cutoff: self.cutoff.unwrap_or(defaults.cutoff),
            sampling_rate: self.sampling_rate.unwrap_or(defaults.sampling_rate),
            order: self.order.unwrap_or(defaults.order),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LowpassResponse {
    pub data: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GaussianRequest {
    #[serde(flatten)]
    pub kernel: GaussianParams,
    pub points: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GaussianResponse {
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
