use serde::{Deserialize, Serialize};

use crate::prelude::{NumericError, NumericResult};

/// Center and spread of an isotropic 2D Gaussian.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaussianParams {
    pub center: (f64, f64),
    pub spread: f64,
}

impl Default for GaussianParams {
    fn default() -> Self {
        Self {
            center: (0.0, 0.0),
            spread: 1.0,
        }
    }
}

/// Isotropic 2D Gaussian with peak value 1 at its center:
/// `f(x, y) = exp(-((x - mu_x)^2 + (y - mu_y)^2) / (2 sigma^2))`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianKernel {
    params: GaussianParams,
    inv_two_sigma2: f64,
}

impl GaussianKernel {
    pub fn new(center: (f64, f64), spread: f64) -> NumericResult<Self> {
        Self::from_params(GaussianParams { center, spread })
    }

    pub fn from_params(params: GaussianParams) -> NumericResult<Self> {
        if !(params.spread > 0.0) || !params.spread.is_finite() {
            return Err(NumericError::InvalidParameter(format!(
                "spread must be positive and finite, got {}",
                params.spread
            )));
        }
        let inv_two_sigma2 = 1.0 / (2.0 * params.spread * params.spread);
        // spread^2 must neither underflow to 0 nor overflow to inf
        if !(inv_two_sigma2 > 0.0) || !inv_two_sigma2.is_finite() {
            return Err(NumericError::InvalidParameter(format!(
                "spread {} is outside the representable range",
                params.spread
            )));
        }
        Ok(Self {
            params,
            inv_two_sigma2,
        })
    }

    pub fn params(&self) -> GaussianParams {
        self.params
    }

    pub fn evaluate(&self, x: f64, y: f64) -> f64 {
        let dx = x - self.params.center.0;
        let dy = y - self.params.center.1;
        (-(dx * dx + dy * dy) * self.inv_two_sigma2).exp()
    }
}

impl Default for GaussianKernel {
    fn default() -> Self {
        Self {
            params: GaussianParams::default(),
            inv_two_sigma2: 0.5,
        }
    }
}

/// Builds a kernel and hands it back as a plain `(x, y) -> value` closure.
pub fn evaluate_gaussian(
    center: (f64, f64),
    spread: f64,
) -> NumericResult<impl Fn(f64, f64) -> f64> {
    let kernel = GaussianKernel::new(center, spread)?;
    Ok(move |x, y| kernel.evaluate(x, y))
}
