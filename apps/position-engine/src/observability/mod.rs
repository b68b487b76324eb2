//! Observability module for metrics and logging.
//!
//! Structured logs go through `tracing`; counters and histograms through
//! `metrics`, exported by Prometheus when enabled in the config.

mod logging;
mod metrics;

pub use logging::{LoggingError, default_filter, init_tracing};
pub use self::metrics::{MetricsError, init_metrics, record_calculation, record_http_request};
