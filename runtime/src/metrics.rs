//! Prometheus metrics for the interceptor.
//!
//! Recorded metrics:
//! - Requests issued, per client
//! - Successful and failed completions, per client
//! - Actions passed through untouched
//! - Request duration
//!
//! # Example
//!
//! ```rust,no_run
//! use http_lifecycle_runtime::metrics::MetricsRecorder;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut recorder = MetricsRecorder::new();
//! recorder.install()?;
//!
//! // Serve this from whatever endpoint the host application scrapes.
//! if let Some(rendered) = recorder.render() {
//!     println!("{rendered}");
//! }
//! # Ok(())
//! # }
//! ```

use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;
use thiserror::Error;

pub use metrics::{counter, histogram};

/// Errors from metrics operations.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Failed to build metrics exporter
    #[error("Failed to build metrics exporter: {0}")]
    Build(String),
    /// Failed to install metrics exporter
    #[error("Failed to install metrics exporter: {0}")]
    Install(String),
}

/// Process-wide Prometheus recorder for the interceptor metrics.
///
/// Installing it does not open a listener; the host application exposes
/// [`MetricsRecorder::render`] on its own endpoint.
#[derive(Default)]
pub struct MetricsRecorder {
    handle: Option<PrometheusHandle>,
}

impl MetricsRecorder {
    /// Create a recorder that is not yet installed.
    #[must_use]
    pub const fn new() -> Self {
        Self { handle: None }
    }

    /// Register metric descriptions and install the Prometheus recorder.
    ///
    /// # Errors
    ///
    /// Returns error if the exporter cannot be built or installed.
    ///
    /// # Note
    ///
    /// A recorder that is already installed (e.g. by another test) is not an
    /// error; [`MetricsRecorder::render`] then returns `None`.
    pub fn install(&mut self) -> Result<(), MetricsError> {
        describe_metrics();

        let builder = PrometheusBuilder::new()
            .set_buckets_for_metric(
                Matcher::Suffix("duration_seconds".to_string()),
                &[
                    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0,
                ],
            )
            .map_err(|e| MetricsError::Build(e.to_string()))?;

        match builder.install_recorder() {
            Ok(handle) => {
                self.handle = Some(handle);
                tracing::info!("Metrics recorder installed");
                Ok(())
            }
            Err(e) => {
                let err_msg = e.to_string();
                if err_msg.contains("already initialized") {
                    tracing::warn!("Metrics recorder already initialized, skipping re-initialization");
                    Ok(())
                } else {
                    Err(MetricsError::Install(err_msg))
                }
            }
        }
    }

    /// Get the metrics handle for rendering.
    #[must_use]
    pub const fn handle(&self) -> Option<&PrometheusHandle> {
        self.handle.as_ref()
    }

    /// Render current metrics in Prometheus format.
    ///
    /// Returns `None` if this instance did not install the recorder.
    #[must_use]
    pub fn render(&self) -> Option<String> {
        self.handle.as_ref().map(PrometheusHandle::render)
    }
}

/// Register all metric descriptions.
pub fn describe_metrics() {
    describe_counter!(
        "http_lifecycle_requests_total",
        "Total number of HTTP requests issued by the interceptor"
    );
    describe_counter!(
        "http_lifecycle_successes_total",
        "Total number of HTTP requests that completed successfully"
    );
    describe_counter!(
        "http_lifecycle_failures_total",
        "Total number of HTTP requests that failed"
    );
    describe_counter!(
        "http_lifecycle_passthrough_total",
        "Total number of actions forwarded without an HTTP call"
    );
    describe_histogram!(
        "http_lifecycle_request_duration_seconds",
        "Time from issuing a request to its completion"
    );
}

/// Interceptor metrics recorder.
pub struct InterceptorMetrics;

impl InterceptorMetrics {
    /// Record a request issued to `client`.
    pub fn record_request(client: &str) {
        counter!("http_lifecycle_requests_total", "client" => client.to_string()).increment(1);
    }

    /// Record a finished request.
    pub fn record_completion(client: &str, succeeded: bool, duration: Duration) {
        if succeeded {
            counter!("http_lifecycle_successes_total", "client" => client.to_string()).increment(1);
        } else {
            counter!("http_lifecycle_failures_total", "client" => client.to_string()).increment(1);
        }
        histogram!("http_lifecycle_request_duration_seconds", "client" => client.to_string())
            .record(duration.as_secs_f64());
    }

    /// Record an action forwarded untouched.
    pub fn record_passthrough() {
        counter!("http_lifecycle_passthrough_total").increment(1);
    }
}
