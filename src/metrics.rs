use axum::{routing::get, Router};
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

use crate::classifier::SentimentLabel;

// A process can only hold one global recorder; every `app()` shares it.
static HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder (first call only) and return a handle to it.
    pub fn init() -> anyhow::Result<Self> {
        let handle = HANDLE
            .get_or_try_init(|| PrometheusBuilder::new().install_recorder())?
            .clone();
        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}

pub fn record_request(endpoint: &'static str) {
    counter!("sentiment_requests_total", "endpoint" => endpoint).increment(1);
}

pub fn record_label(label: SentimentLabel) {
    counter!("sentiment_label_total", "label" => label.as_str()).increment(1);
}

pub fn record_error(kind: &'static str) {
    counter!("sentiment_errors_total", "kind" => kind).increment(1);
}

pub fn record_duration_ms(ms: f64) {
    histogram!("sentiment_duration_ms").record(ms);
}
