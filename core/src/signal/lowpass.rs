use serde::{Deserialize, Serialize};

use crate::prelude::{NumericError, NumericResult};
use crate::signal::butterworth::{Butterworth, FilterDesign, MAX_ORDER};
use crate::signal::filtfilt::filtfilt;
use crate::telemetry::log::LogManager;

/// Cutoff and sampling rate in Hz, plus the filter order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterParams {
    pub cutoff: f64,
    pub sampling_rate: f64,
    pub order: usize,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            cutoff: 5.0,
            sampling_rate: 100.0,
            order: 4,
        }
    }
}

impl FilterParams {
    /// Cutoff as a fraction of the Nyquist frequency.
    pub fn normalized_cutoff(&self) -> f64 {
        self.cutoff / (0.5 * self.sampling_rate)
    }

    pub fn validate(&self) -> NumericResult<()> {
        if !(self.sampling_rate > 0.0) || !self.sampling_rate.is_finite() {
            return Err(NumericError::InvalidParameter(format!(
                "sampling rate must be positive and finite, got {}",
                self.sampling_rate
            )));
        }
        if self.order == 0 || self.order > MAX_ORDER {
            return Err(NumericError::InvalidParameter(format!(
                "filter order must lie in 1..={}, got {}",
                MAX_ORDER, self.order
            )));
        }
        let wn = self.normalized_cutoff();
        if !(wn > 0.0 && wn < 1.0) {
            return Err(NumericError::InvalidParameter(format!(
                "cutoff {} Hz is outside (0, {}) Hz for sampling rate {} Hz",
                self.cutoff,
                0.5 * self.sampling_rate,
                self.sampling_rate
            )));
        }
        Ok(())
    }
}

/// Zero-phase low-pass filter over a pluggable coefficient designer.
pub struct LowPassFilter<D = Butterworth> {
    params: FilterParams,
    designer: D,
    logger: LogManager,
}

impl LowPassFilter<Butterworth> {
    pub fn new(params: FilterParams) -> NumericResult<Self> {
        Self::with_designer(params, Butterworth)
    }
}

impl<D: FilterDesign> LowPassFilter<D> {
    pub fn with_designer(params: FilterParams, designer: D) -> NumericResult<Self> {
        params.validate()?;
        Ok(Self {
            params,
            designer,
            logger: LogManager::new("lowpass"),
        })
    }

    pub fn params(&self) -> FilterParams {
        self.params
    }

    pub fn apply(&self, data: &[f64]) -> NumericResult<Vec<f64>> {
        if data.is_empty() {
            return Err(NumericError::EmptyInput("no samples to filter".into()));
        }
        let wn = self.params.normalized_cutoff();
        let tf = self.designer.design_lowpass(self.params.order, wn)?;
        self.logger.detail(&format!(
            "order {} wn {:.4} over {} samples",
            self.params.order,
            wn,
            data.len()
        ));
        filtfilt(&tf, data)
    }
}

/// Zero-phase Butterworth low-pass of `data`.
pub fn lowpass(
    data: &[f64],
    cutoff: f64,
    sampling_rate: f64,
    order: usize,
) -> NumericResult<Vec<f64>> {
    LowPassFilter::new(FilterParams {
        cutoff,
        sampling_rate,
        order,
    })?
    .apply(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::butterworth::TransferFunction;
    use std::cell::Cell;
    use std::f64::consts::PI;

    fn tone(freq: f64, fs: f64, len: usize) -> Vec<f64> {
        (0..len)
            .map(|i| (2.0 * PI * freq * i as f64 / fs).sin())
            .collect()
    }

    struct Passthrough {
        seen: Cell<Option<(usize, f64)>>,
    }

    impl FilterDesign for Passthrough {
        fn design_lowpass(
            &self,
            order: usize,
            normalized_cutoff: f64,
        ) -> NumericResult<TransferFunction> {
            self.seen.set(Some((order, normalized_cutoff)));
            TransferFunction::new(vec![1.0], vec![1.0])
        }
    }

    #[test]
    fn output_matches_input_length() {
        for &(len, order) in &[(1usize, 1usize), (7, 2), (100, 4), (513, 6)] {
            let data = tone(3.0, 100.0, len);
            assert_eq!(lowpass(&data, 5.0, 100.0, order).unwrap().len(), len);
        }
    }

    #[test]
    fn keeps_low_tone_without_phase_shift() {
        let data = tone(1.0, 100.0, 500);
        let filtered = lowpass(&data, 5.0, 100.0, 4).unwrap();
        for i in 100..400 {
            assert!((filtered[i] - data[i]).abs() < 0.02, "sample {}", i);
        }
    }

    #[test]
    fn attenuates_high_tone() {
        let data = tone(40.0, 100.0, 500);
        let filtered = lowpass(&data, 5.0, 100.0, 4).unwrap();
        let peak = filtered[100..400]
            .iter()
            .fold(0.0f64, |acc, v| acc.max(v.abs()));
        assert!(peak < 1e-2, "peak {}", peak);
    }

    #[test]
    fn cutoff_at_or_above_nyquist_is_rejected() {
        let data = tone(1.0, 100.0, 32);
        for &cutoff in &[50.0, 75.0, 0.0, -1.0] {
            assert!(matches!(
                lowpass(&data, cutoff, 100.0, 4),
                Err(NumericError::InvalidParameter(_))
            ));
        }
    }

    #[test]
    fn invalid_rate_and_order_are_rejected() {
        let data = [1.0, 2.0, 3.0];
        assert!(lowpass(&data, 5.0, 0.0, 4).is_err());
        assert!(lowpass(&data, 5.0, f64::NAN, 4).is_err());
        assert!(lowpass(&data, 5.0, 100.0, 0).is_err());
    }

    #[test]
    fn huge_order_is_rejected_before_design() {
        let data = [1.0, 2.0, 3.0];
        for order in [MAX_ORDER + 1, 1usize << 40] {
            assert!(matches!(
                lowpass(&data, 5.0, 100.0, order),
                Err(NumericError::InvalidParameter(_))
            ));
        }
    }

    #[test]
    fn empty_data_is_rejected() {
        assert!(matches!(
            lowpass(&[], 5.0, 100.0, 4),
            Err(NumericError::EmptyInput(_))
        ));
    }

    #[test]
    fn designer_receives_normalized_cutoff() {
        let designer = Passthrough {
            seen: Cell::new(None),
        };
        let filter = LowPassFilter::with_designer(FilterParams::default(), designer).unwrap();
        let data = tone(2.0, 100.0, 50);

        assert_eq!(filter.apply(&data).unwrap(), data);
        assert_eq!(filter.designer.seen.get(), Some((4, 0.1)));
    }

    #[test]
    fn params_deserialize_with_defaults() {
        let params: FilterParams = serde_json::from_str(r#"{"cutoff": 12.5}"#).unwrap();
        assert_eq!(params.sampling_rate, 100.0);
        assert_eq!(params.order, 4);
        assert!((params.normalized_cutoff() - 0.25).abs() < 1e-12);
    }
}
