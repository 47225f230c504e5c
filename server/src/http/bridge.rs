//! HTTP front end exposing the numeric core as JSON routes.

use crate::http::metrics::MetricsRecorder;
use crate::http::model::{
    AlignRequest, ErrorResponse, GaussianRequest, GaussianResponse, LowpassRequest,
    LowpassResponse,
};
use crate::workflow::config::ServerConfig;
use anyhow::Context;
use cxnmath::kernel::GaussianKernel;
use cxnmath::signal::{align, LowPassFilter};
use cxnmath::{NumericError, NumericResult};
use log::{info, warn};
use serde::Serialize;
use std::sync::Arc;
use warp::http::StatusCode;
use warp::reply::{Json, WithStatus};
use warp::{Filter, Rejection, Reply};

const MAX_BODY_BYTES: u64 = 16 * 1024 * 1024;

fn respond<T: Serialize>(
    route: &str,
    metrics: &MetricsRecorder,
    result: NumericResult<T>,
) -> WithStatus<Json> {
    match result {
        Ok(value) => {
            metrics.record_processed();
            warp::reply::with_status(warp::reply::json(&value), StatusCode::OK)
        }
        Err(err) => {
            metrics.record_error();
            warn!("{} rejected: {}", route, err);
            warp::reply::with_status(
                warp::reply::json(&ErrorResponse {
                    error: err.to_string(),
                }),
                StatusCode::BAD_REQUEST,
            )
        }
    }
}

/// Runs a core computation on the blocking pool so long searches do not stall
/// the runtime workers serving other routes.
async fn respond_blocking<T, F>(
    route: &'static str,
    metrics: Arc<MetricsRecorder>,
    job: F,
) -> Result<WithStatus<Json>, Rejection>
where
    T: Serialize + Send + 'static,
    F: FnOnce() -> NumericResult<T> + Send + 'static,
{
    let result = tokio::task::spawn_blocking(job).await.unwrap_or_else(|err| {
        Err(NumericError::Internal(format!(
            "{} task failed: {}",
            route, err
        )))
    });
    Ok(respond(route, &metrics, result))
}

/// All routes, sharing one config and one set of request counters.
pub fn routes(
    config: Arc<ServerConfig>,
    metrics: Arc<MetricsRecorder>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let config_filter = warp::any().map(move || config.clone());
    let metrics_filter = warp::any().map(move || metrics.clone());
    let json_body = warp::body::content_length_limit(MAX_BODY_BYTES);

    let align_route = warp::path!("align")
        .and(warp::post())
        .and(json_body)
        .and(warp::body::json())
        .and(config_filter.clone())
        .and(metrics_filter.clone())
        .and_then(
            |request: AlignRequest, config: Arc<ServerConfig>, metrics: Arc<MetricsRecorder>| {
                let limit = config.max_lag;
                respond_blocking("align", metrics, move || {
                    let max_lag = request.max_lag.unwrap_or(limit);
                    if max_lag > limit {
                        return Err(NumericError::InvalidParameter(format!(
                            "max_lag {} exceeds the configured limit of {}",
                            max_lag, limit
                        )));
                    }
                    align(&request.a, &request.b, max_lag)
                })
            },
        );

    let lowpass_route = warp::path!("lowpass")
        .and(warp::post())
        .and(json_body)
        .and(warp::body::json())
        .and(config_filter)
        .and(metrics_filter.clone())
        .and_then(
            |request: LowpassRequest, config: Arc<ServerConfig>, metrics: Arc<MetricsRecorder>| {
                let params = request.params(config.filter);
                respond_blocking("lowpass", metrics, move || {
                    LowPassFilter::new(params)
                        .and_then(|filter| filter.apply(&request.data))
                        .map(|data| LowpassResponse { data })
                })
            },
        );

    let gaussian_route = warp::path!("gaussian")
        .and(warp::post())
        .and(json_body)
        .and(warp::body::json())
        .and(metrics_filter.clone())
        .map(|request: GaussianRequest, metrics: Arc<MetricsRecorder>| {
            let result = GaussianKernel::from_params(request.kernel).map(|kernel| {
                let values = request
                    .points
                    .iter()
                    .map(|&[x, y]| kernel.evaluate(x, y))
                    .collect();
                GaussianResponse { values }
            });
            respond("gaussian", &metrics, result)
        });

    let metrics_route = warp::path!("metrics")
        .and(warp::get())
        .and(metrics_filter)
        .map(|metrics: Arc<MetricsRecorder>| warp::reply::json(&metrics.snapshot()));

    align_route
        .or(lowpass_route)
        .or(gaussian_route)
        .or(metrics_route)
        .with(warp::log("cxnserve::http"))
}

/// Serve until Ctrl+C.
pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let address = config.bind_address()?;
    let api = routes(Arc::new(config), Arc::new(MetricsRecorder::new()));

    let (bound, server) = warp::serve(api)
        .try_bind_with_graceful_shutdown(address, async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                warn!("failed to listen for Ctrl+C: {}", err);
            }
        })
        .with_context(|| format!("binding HTTP listener on {}", address))?;

    info!("listening on http://{}", bound);
    server.await;
    info!("HTTP listener on {} stopped", bound);
    Ok(())
}
