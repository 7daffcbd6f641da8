// src/error.rs
//! Error taxonomy for the classifier, its HTTP wrapper and the caller-side client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failure inside the classification pipeline. Pattern evaluation itself is infallible,
/// so the only source is the lexicon collaborator.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ClassifierError {
    #[error("lexicon lookup failed: {0}")]
    LexiconFault(String),
}

/// Errors surfaced by the `/sentiment` handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Body missing, malformed, or `sentence` absent/blank.
    #[error("No sentence provided")]
    InvalidInput,
    /// The body could not be read at all (too large, aborted stream). Keeps the status axum chose.
    #[error("request body rejected: {reason}")]
    BodyRejected { status: StatusCode, reason: String },
    #[error(transparent)]
    Classifier(#[from] ClassifierError),
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::InvalidInput => "invalid_input",
            ApiError::BodyRejected { .. } => "body_rejected",
            ApiError::Classifier(_) => "classifier_fault",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::InvalidInput => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "No sentence provided" })),
            )
                .into_response(),
            ApiError::BodyRejected { status, reason } => {
                (status, Json(json!({ "error": reason }))).into_response()
            }
            ApiError::Classifier(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": "Error performing sentiment analysis" })),
            )
                .into_response(),
        }
    }
}

/// Caller-side failure talking to the sentiment service. Never fatal for the caller.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("sentiment service unavailable: {0}")]
    UpstreamUnavailable(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::UpstreamUnavailable(e.to_string())
    }
}
