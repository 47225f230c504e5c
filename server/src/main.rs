use anyhow::Context;
use clap::Parser;
use cxnmath::signal::DEFAULT_MAX_LAG;
use generator::profile::{build_signal_pair, SignalConfig};
use log::info;
use serde_json::json;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use tokio::runtime::Builder as TokioBuilder;
use workflow::config::ServerConfig;
use workflow::runner::Runner;

mod generator;
mod http;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Signal alignment and filtering service")]
struct Args {
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    #[arg(long, default_value_t = 8000)]
    port: u16,
    /// Worker threads for the HTTP runtime
    #[arg(long, default_value_t = 1)]
    workers: usize,
    /// Load the server config from YAML instead of the flags above
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, default_value_t = DEFAULT_MAX_LAG)]
    max_lag: isize,
    /// Align a synthetic delayed signal pair and print the recovered lag
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Samples of delay in the synthetic pair used by --offline
    #[arg(long, default_value_t = 12)]
    delay: isize,
    /// Append the offline result as a JSON line to this file
    #[arg(long)]
    report: Option<PathBuf>,
    /// Serve the numeric routes over HTTP until Ctrl+C
    #[arg(long, default_value_t = false)]
    serve: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = if let Some(path) = args.config {
        ServerConfig::load(path)?
    } else {
        ServerConfig::from_args(args.host, args.port, args.workers, args.max_lag)
    };
    config.validate()?;

    if args.offline {
        let signal = SignalConfig {
            delay: args.delay,
            sampling_rate: config.filter.sampling_rate,
            ..Default::default()
        };
        let pair = build_signal_pair(&signal)?;
        let result = Runner::new(config.clone()).execute(&pair)?;

        println!(
            "Offline run -> lag {} (expected {}), overlap {}, residual rms {:.5}",
            result.lag,
            signal.expected_lag(),
            result.overlap,
            result.residual_rms
        );

        if let Some(report_path) = args.report {
            if let Some(parent) = report_path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
            let line = json!({
                "signal": signal,
                "result": result,
            });
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&report_path)
                .with_context(|| format!("opening report {}", report_path.display()))?;
            writeln!(file, "{}", line)?;
        }
    }

    if args.serve {
        let runtime = TokioBuilder::new_multi_thread()
            .worker_threads(config.workers)
            .enable_all()
            .build()
            .context("building HTTP runtime")?;
        runtime.block_on(http::bridge::serve(config))?;
    } else if !args.offline {
        info!("nothing to do, pass --offline or --serve");
    }

    Ok(())
}
