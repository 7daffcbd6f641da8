use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};

use crate::classifier::{Classification, SentimentClassifier, SentimentLabel};
use crate::error::{ApiError, ClassifierError};
use crate::metrics;
use crate::patterns::PatternHit;

const LOG_TEXT_MAX_CHARS: usize = 80;

#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<SentimentClassifier>,
}

impl AppState {
    pub fn new(classifier: SentimentClassifier) -> Self {
        Self {
            classifier: Arc::new(classifier),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/sentiment", post(sentiment))
        .route("/sentiment/test", post(sentiment_test))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(Deserialize)]
struct SentimentReq {
    #[serde(default)]
    sentence: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SentimentResp {
    sentiment_score: f64,
    sentiment: SentimentLabel,
    debug: DebugScores,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DebugScores {
    base_score: f64,
    pattern_adjustment: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TestResp {
    sentence: String,
    base_score: f64,
    pattern_adjustment: f64,
    final_score: f64,
    sentiment: SentimentLabel,
    patterns: Vec<PatternHit>,
    threshold: Thresholds,
}

#[derive(Debug, Serialize)]
struct Thresholds {
    negative: &'static str,
    neutral: &'static str,
    positive: &'static str,
}

const THRESHOLDS: Thresholds = Thresholds {
    negative: "< 0",
    neutral: "0 to 0.2",
    positive: "> 0.2",
};

/// Absent field, `null`, blank text, or an unparseable body all count as "no sentence".
/// A body that could not be read (over the 2 MB default limit, for one) keeps its own status.
fn extract_sentence(
    endpoint: &'static str,
    body: Result<Json<SentimentReq>, JsonRejection>,
) -> Result<String, ApiError> {
    let sentence = match body {
        Ok(Json(req)) => req.sentence,
        Err(JsonRejection::BytesRejection(rej)) => {
            let err = ApiError::BodyRejected {
                status: rej.status(),
                reason: rej.body_text(),
            };
            warn!(target: "sentiment", endpoint, status = %rej.status(), reason = %rej.body_text(), "request body unreadable");
            metrics::record_error(err.kind());
            return Err(err);
        }
        Err(rej) => {
            warn!(target: "sentiment", endpoint, reason = %rej.body_text(), "request body rejected");
            None
        }
    };
    match sentence {
        Some(s) if !s.trim().is_empty() => Ok(s),
        _ => {
            warn!(target: "sentiment", endpoint, "No sentence provided");
            metrics::record_error(ApiError::InvalidInput.kind());
            Err(ApiError::InvalidInput)
        }
    }
}

fn run_classifier(
    state: &AppState,
    endpoint: &'static str,
    sentence: &str,
) -> Result<Classification, ClassifierError> {
    let started = Instant::now();
    let res = state.classifier.classify(sentence);
    metrics::record_duration_ms(started.elapsed().as_secs_f64() * 1_000.0);

    match &res {
        Ok(c) => {
            metrics::record_label(c.label);
            info!(
                target: "sentiment",
                endpoint,
                id = %anon_hash(sentence),
                base_score = c.base_score,
                pattern_adjustment = c.pattern_adjustment,
                final_score = c.final_score,
                sentiment = %c.label,
                "classified"
            );
        }
        Err(e) => {
            metrics::record_error("classifier_fault");
            error!(
                target: "sentiment",
                endpoint,
                id = %anon_hash(sentence),
                input = %truncate_chars(sentence, LOG_TEXT_MAX_CHARS),
                error = %e,
                "Error performing sentiment analysis"
            );
        }
    }
    res
}

async fn sentiment(
    State(state): State<AppState>,
    body: Result<Json<SentimentReq>, JsonRejection>,
) -> Result<Json<SentimentResp>, ApiError> {
    metrics::record_request("sentiment");
    let sentence = extract_sentence("sentiment", body)?;
    let c = run_classifier(&state, "sentiment", &sentence)?;

    Ok(Json(SentimentResp {
        sentiment_score: c.final_score,
        sentiment: c.label,
        debug: DebugScores {
            base_score: c.base_score,
            pattern_adjustment: c.pattern_adjustment,
        },
    }))
}

async fn sentiment_test(
    State(state): State<AppState>,
    body: Result<Json<SentimentReq>, JsonRejection>,
) -> Response {
    metrics::record_request("sentiment_test");
    let sentence = match extract_sentence("sentiment_test", body) {
        Ok(s) => s,
        Err(e) => return e.into_response(),
    };

    match run_classifier(&state, "sentiment_test", &sentence) {
        Ok(c) => Json(TestResp {
            sentence,
            base_score: c.base_score,
            pattern_adjustment: c.pattern_adjustment,
            final_score: c.final_score,
            sentiment: c.label,
            patterns: c.hits,
            threshold: THRESHOLDS,
        })
        .into_response(),
        // The diagnostic endpoint exposes the underlying message.
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}

/// Short stable id for correlating log lines without logging whole comments.
pub(crate) fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let digest = Sha256::digest(text.as_bytes());
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}
