// src/lib.rs
// Public library surface for the service binary, the probe binary, and integration tests.

pub mod api;
pub mod classifier;
pub mod client;
pub mod config;
pub mod error;
pub mod lexicon;
pub mod metrics;
pub mod patterns;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::classifier::{Classification, ScoreMode, SentimentClassifier, SentimentLabel};
pub use crate::client::{SentimentClient, SentimentSource, TaggedComment};
pub use crate::config::ServiceConfig;

use axum::Router;
use tracing::info;

/// Build the full router from an explicit config: classifier, routes, and (when enabled)
/// the `/metrics` endpoint.
pub fn build_app(cfg: &ServiceConfig) -> anyhow::Result<Router> {
    let classifier = SentimentClassifier::from_config(cfg)?;
    info!(
        target: "sentiment",
        patterns = classifier.patterns().len(),
        mode = ?classifier.mode(),
        lexicon = %cfg
            .lexicon_path
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "embedded".into()),
        "classifier ready"
    );

    let mut app = api::router(AppState::new(classifier));
    if cfg.debug_routes {
        let m = metrics::Metrics::init()?;
        app = app.merge(m.router());
    }
    Ok(app)
}

/// Same router the binary serves, configured from `config/sentiment.toml` + environment.
pub async fn app() -> anyhow::Result<Router> {
    let cfg = ServiceConfig::load_default()?;
    build_app(&cfg)
}
