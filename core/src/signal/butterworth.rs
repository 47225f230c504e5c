//! Digital Butterworth low-pass design.
//!
//! The analog prototype poles are pre-warped to the requested cutoff, mapped
//! through the bilinear transform and expanded into transfer-function
//! polynomials in `z^-1`.

use num_complex::Complex64;
use std::f64::consts::PI;

use crate::prelude::{NumericError, NumericResult};

/// Sampling rate the bilinear transform is evaluated at when the cutoff is
/// given as a fraction of Nyquist.
const NORMALIZED_FS: f64 = 2.0;

/// Highest order the polynomial expansion is accepted for; beyond this the
/// coefficients lose all precision.
pub const MAX_ORDER: usize = 24;

/// IIR filter coefficients, numerator `b` and denominator `a`, in descending
/// powers of `z^-1`.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferFunction {
    pub b: Vec<f64>,
    pub a: Vec<f64>,
}

impl TransferFunction {
    pub fn new(b: Vec<f64>, a: Vec<f64>) -> NumericResult<Self> {
        if b.is_empty() || a.is_empty() {
            return Err(NumericError::EmptyInput(
                "transfer function needs numerator and denominator coefficients".into(),
            ));
        }
        if a[0] == 0.0 || !a[0].is_finite() {
            return Err(NumericError::InvalidParameter(format!(
                "leading denominator coefficient must be finite and non-zero, got {}",
                a[0]
            )));
        }
        Ok(Self { b, a })
    }

    /// Number of taps once numerator and denominator are padded to match.
    pub fn taps(&self) -> usize {
        self.b.len().max(self.a.len())
    }

    /// Coefficients divided by `a[0]` and zero-padded to a common length.
    pub fn normalized(&self) -> (Vec<f64>, Vec<f64>) {
        let taps = self.taps();
        let a0 = self.a[0];
        let mut b: Vec<f64> = self.b.iter().map(|v| v / a0).collect();
        let mut a: Vec<f64> = self.a.iter().map(|v| v / a0).collect();
        b.resize(taps, 0.0);
        a.resize(taps, 0.0);
        (b, a)
    }
}

/// Source of low-pass filter coefficients.
pub trait FilterDesign {
    /// `normalized_cutoff` is the cutoff as a fraction of Nyquist, in (0, 1).
    fn design_lowpass(&self, order: usize, normalized_cutoff: f64)
        -> NumericResult<TransferFunction>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Butterworth;

impl Butterworth {
    /// Poles of the order-`n` analog prototype with unit cutoff.
    fn prototype_poles(order: usize) -> Vec<Complex64> {
        let n = order as f64;
        (0..order)
            .map(|k| {
                let m = 2.0 * k as f64 - (n - 1.0);
                -Complex64::from_polar(1.0, PI * m / (2.0 * n))
            })
            .collect()
    }
}

/// Expand `prod(z - root)` into coefficients, highest power first.
fn poly(roots: &[Complex64]) -> Vec<Complex64> {
    let mut coeffs = vec![Complex64::new(1.0, 0.0)];
    for &root in roots {
        let mut next = coeffs.clone();
        next.push(Complex64::new(0.0, 0.0));
        for (i, &c) in coeffs.iter().enumerate() {
            next[i + 1] -= root * c;
        }
        coeffs = next;
    }
    coeffs
}

impl FilterDesign for Butterworth {
    fn design_lowpass(
        &self,
        order: usize,
        normalized_cutoff: f64,
    ) -> NumericResult<TransferFunction> {
        if order == 0 || order > MAX_ORDER {
            return Err(NumericError::InvalidParameter(format!(
                "filter order must lie in 1..={}, got {}",
                MAX_ORDER, order
            )));
        }
        if !(normalized_cutoff > 0.0 && normalized_cutoff < 1.0) {
            return Err(NumericError::InvalidParameter(format!(
                "normalized cutoff must lie in (0, 1), got {}",
                normalized_cutoff
            )));
        }

        let fs2 = 2.0 * NORMALIZED_FS;
        let warped = fs2 * (PI * normalized_cutoff / NORMALIZED_FS).tan();

        let analog: Vec<Complex64> = Self::prototype_poles(order)
            .into_iter()
            .map(|p| p * warped)
            .collect();
        let analog_gain = warped.powi(order as i32);

        let poles: Vec<Complex64> = analog.iter().map(|&p| (fs2 + p) / (fs2 - p)).collect();
        // every analog zero sits at infinity, which maps to z = -1
        let zeros = vec![Complex64::new(-1.0, 0.0); order];
        let denominator: Complex64 = analog.iter().map(|&p| fs2 - p).product();
        let gain = analog_gain * (Complex64::new(1.0, 0.0) / denominator).re;

        let b = poly(&zeros).iter().map(|c| gain * c.re).collect();
        let a = poly(&poles).iter().map(|c| c.re).collect();
        TransferFunction::new(b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_coeffs(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-8, "{:?} != {:?}", actual, expected);
        }
    }

    #[test]
    fn first_order_half_band() {
        let tf = Butterworth.design_lowpass(1, 0.5).unwrap();
        assert_coeffs(&tf.b, &[0.5, 0.5]);
        assert_coeffs(&tf.a, &[1.0, 0.0]);
    }

    #[test]
    fn second_order_half_band() {
        let tf = Butterworth.design_lowpass(2, 0.5).unwrap();
        assert_coeffs(&tf.b, &[0.292_893_218_8, 0.585_786_437_6, 0.292_893_218_8]);
        assert_coeffs(&tf.a, &[1.0, 0.0, 0.171_572_875_3]);
    }

    #[test]
    fn fourth_order_has_unit_dc_gain() {
        let tf = Butterworth.design_lowpass(4, 0.1).unwrap();
        assert_eq!(tf.b.len(), 5);
        assert_eq!(tf.a.len(), 5);
        let dc = tf.b.iter().sum::<f64>() / tf.a.iter().sum::<f64>();
        assert!((dc - 1.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_out_of_range_cutoff() {
        for &wn in &[0.0, 1.0, 1.5, -0.2, f64::NAN] {
            assert!(matches!(
                Butterworth.design_lowpass(4, wn),
                Err(NumericError::InvalidParameter(_))
            ));
        }
    }

    #[test]
    fn rejects_order_outside_supported_range() {
        for order in [0, MAX_ORDER + 1, 1usize << 40] {
            assert!(matches!(
                Butterworth.design_lowpass(order, 0.3),
                Err(NumericError::InvalidParameter(_))
            ));
        }
        assert!(Butterworth.design_lowpass(MAX_ORDER, 0.3).is_ok());
    }

    #[test]
    fn transfer_function_requires_leading_denominator() {
        assert!(TransferFunction::new(vec![1.0], vec![0.0, 1.0]).is_err());
        assert!(TransferFunction::new(vec![], vec![1.0]).is_err());
    }

    #[test]
    fn normalized_pads_and_scales() {
        let tf = TransferFunction::new(vec![2.0], vec![2.0, 1.0]).unwrap();
        assert_eq!(tf.normalized(), (vec![1.0, 0.0], vec![1.0, 0.5]));
    }
}
