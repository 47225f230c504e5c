use crate::generator::profile::SignalPair;
use crate::workflow::config::ServerConfig;
use anyhow::Context;
use cxnmath::math::StatsHelper;
use cxnmath::signal::{align, LowPassFilter};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct WorkflowResult {
    pub lag: isize,
    pub overlap: usize,
    pub residual_rms: f64,
}

/// Offline pass: low-pass both signals, then align them.
#[derive(Clone)]
pub struct Runner {
    config: ServerConfig,
}

impl Runner {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self, pair: &SignalPair) -> anyhow::Result<WorkflowResult> {
        let filter =
            LowPassFilter::new(self.config.filter).context("configuring low-pass filter")?;
        let reference = filter
            .apply(&pair.reference)
            .context("filtering reference signal")?;
        let delayed = filter
            .apply(&pair.delayed)
            .context("filtering delayed signal")?;

        let alignment =
            align(&reference, &delayed, self.config.max_lag).context("aligning signals")?;
        let residual: Vec<f64> = alignment
            .a
            .iter()
            .zip(&alignment.b)
            .map(|(a, b)| a - b)
            .collect();

        Ok(WorkflowResult {
            lag: alignment.lag,
            overlap: alignment.a.len(),
            residual_rms: StatsHelper::rms(&residual),
        })
    }
}
