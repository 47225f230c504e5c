//! Causal IIR filtering and its forward-backward (zero-phase) variant.

use ndarray::{Array1, Array2};

use crate::math::matrix::MatrixHelper;
use crate::prelude::{NumericError, NumericResult};
use crate::signal::butterworth::TransferFunction;

/// Direct-form II transposed filter. Returns the output and the final state.
///
/// `zi`, when given, must hold `taps - 1` values.
pub fn lfilter(
    tf: &TransferFunction,
    x: &[f64],
    zi: Option<&[f64]>,
) -> NumericResult<(Vec<f64>, Vec<f64>)> {
    let (b, a) = tf.normalized();
    let order = tf.taps() - 1;
    let mut state = match zi {
        Some(initial) if initial.len() != order => {
            return Err(NumericError::InvalidParameter(format!(
                "initial state needs {} values, got {}",
                order,
                initial.len()
            )));
        }
        Some(initial) => initial.to_vec(),
        None => vec![0.0; order],
    };

    let mut y = Vec::with_capacity(x.len());
    for &sample in x {
        let out = b[0] * sample + state.first().copied().unwrap_or(0.0);
        for i in 0..order {
            let carry = if i + 1 < order { state[i + 1] } else { 0.0 };
            state[i] = b[i + 1] * sample + carry - a[i + 1] * out;
        }
        y.push(out);
    }
    Ok((y, state))
}

/// Initial state that makes `lfilter` start in steady state for a unit step.
pub fn lfilter_zi(tf: &TransferFunction) -> NumericResult<Vec<f64>> {
    let (b, a) = tf.normalized();
    let order = tf.taps() - 1;
    if order == 0 {
        return Ok(Vec::new());
    }

    // I - companion(a)^T
    let mut system = Array2::<f64>::eye(order);
    for i in 0..order {
        system[[i, 0]] += a[i + 1];
        if i + 1 < order {
            system[[i, i + 1]] -= 1.0;
        }
    }
    let rhs: Array1<f64> = (0..order).map(|i| b[i + 1] - a[i + 1] * b[0]).collect();

    Ok(MatrixHelper::solve(system, rhs)?.to_vec())
}

/// Odd extension: `edge` points reflected through each end point.
fn odd_extend(x: &[f64], edge: usize) -> Vec<f64> {
    let first = x[0];
    let last = x[x.len() - 1];
    let tail = x.len() - 1;

    let mut extended = Vec::with_capacity(x.len() + 2 * edge);
    extended.extend((1..=edge).rev().map(|k| 2.0 * first - x[k]));
    extended.extend_from_slice(x);
    extended.extend((1..=edge).map(|k| 2.0 * last - x[tail - k]));
    extended
}

/// Zero-phase filtering: the signal is padded by odd extension, filtered
/// forward then backward from steady-state initial conditions, and the
/// padding is stripped. Output length equals input length.
///
/// The pad is `3 * taps` samples, shortened to `len - 1` for short inputs.
pub fn filtfilt(tf: &TransferFunction, x: &[f64]) -> NumericResult<Vec<f64>> {
    if x.is_empty() {
        return Err(NumericError::EmptyInput("no samples to filter".into()));
    }

    let edge = (3 * tf.taps()).min(x.len() - 1);
    let extended = odd_extend(x, edge);
    let zi = lfilter_zi(tf)?;

    let scaled: Vec<f64> = zi.iter().map(|z| z * extended[0]).collect();
    let (forward, _) = lfilter(tf, &extended, Some(&scaled))?;

    let y0 = forward[forward.len() - 1];
    let reversed: Vec<f64> = forward.into_iter().rev().collect();
    let scaled: Vec<f64> = zi.iter().map(|z| z * y0).collect();
    let (backward, _) = lfilter(tf, &reversed, Some(&scaled))?;

    let len = backward.len();
    Ok(backward
        .into_iter()
        .rev()
        .skip(edge)
        .take(len - 2 * edge)
        .collect())
}
