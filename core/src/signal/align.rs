//! Brute-force lag estimation between two sampled signals.
//!
//! Both inputs are truncated to their common length `n`, then every shift
//! magnitude `s` in `0..max_lag` (bounded so at least one sample overlaps) is
//! scored in both directions by mean squared error:
//!
//! * `+s`: `a[s..]` against `b[..n - s]`
//! * `-s`: `a[..n - s]` against `b[s..]`
//!
//! The positive direction wins exact ties within a magnitude, and the global
//! best only moves on strict improvement, so the smallest magnitude reaching
//! the minimum is reported. With NaN samples the scores are NaN, never compare
//! lower, and the returned lag is undefined (currently whatever a finite score
//! last selected, or 0).

use serde::{Deserialize, Serialize};

use crate::math::stats::StatsHelper;
use crate::prelude::{NumericError, NumericResult};
use crate::telemetry::log::LogManager;

pub const DEFAULT_MAX_LAG: isize = 200;

/// Score the search starts from; any finite MSE below it replaces lag 0.
const MSE_CEILING: f64 = 1e100;

/// Equal-length, time-aligned windows plus the lag that produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alignment {
    pub a: Vec<f64>,
    pub b: Vec<f64>,
    pub lag: isize,
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    lag: isize,
    mse: f64,
}

fn score_magnitude(a: &[f64], b: &[f64], shift: usize) -> Candidate {
    let n = a.len();
    let forward = StatsHelper::mse(&a[shift..], &b[..n - shift]);
    let backward = StatsHelper::mse(&a[..n - shift], &b[shift..]);
    let shift = shift as isize;

    // `<=` keeps ties on the positive side while a NaN forward score still
    // yields to a finite backward one.
    if forward <= backward {
        Candidate {
            lag: shift,
            mse: forward,
        }
    } else {
        Candidate {
            lag: -shift,
            mse: backward,
        }
    }
}

fn best_lag(a: &[f64], b: &[f64], magnitudes: usize) -> Candidate {
    let start = Candidate {
        lag: 0,
        mse: MSE_CEILING,
    };
    (0..magnitudes)
        .map(|shift| score_magnitude(a, b, shift))
        .fold(start, |best, candidate| {
            if candidate.mse < best.mse {
                candidate
            } else {
                best
            }
        })
}

/// Trim `a` and `b` so that `lag` superimposes them.
pub fn apply_lag<'s>(a: &'s [f64], b: &'s [f64], lag: isize) -> (&'s [f64], &'s [f64]) {
    let n = a.len().min(b.len());
    let (a, b) = (&a[..n], &b[..n]);
    let shift = lag.unsigned_abs().min(n);
    if lag > 0 {
        (&a[shift..], &b[..n - shift])
    } else {
        (&a[..n - shift], &b[shift..])
    }
}

/// Find the shift that best superimposes `a` and `b` and return the trimmed
/// windows. Magnitudes `0..max_lag` are searched; `max_lag` itself is not.
pub fn align(a: &[f64], b: &[f64], max_lag: isize) -> NumericResult<Alignment> {
    if a.is_empty() || b.is_empty() {
        return Err(NumericError::EmptyInput(format!(
            "cannot align sequences of length {} and {}",
            a.len(),
            b.len()
        )));
    }
    if max_lag < 0 {
        return Err(NumericError::InvalidParameter(format!(
            "max_lag must be non-negative, got {}",
            max_lag
        )));
    }

    let logger = LogManager::new("align");
    let n = a.len().min(b.len());
    let (a, b) = (&a[..n], &b[..n]);

    let magnitudes = (max_lag as usize).min(n);
    if magnitudes < max_lag as usize {
        logger.caution(&format!(
            "max_lag {} exceeds overlap of {} samples, searching up to {}",
            max_lag,
            n,
            n - 1
        ));
    }

    let best = best_lag(a, b, magnitudes);
    logger.detail(&format!("best lag {} with mse {:e}", best.lag, best.mse));

    let (a_out, b_out) = apply_lag(a, b, best.lag);
    Ok(Alignment {
        a: a_out.to_vec(),
        b: b_out.to_vec(),
        lag: best.lag,
    })
}
