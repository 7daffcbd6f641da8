// tests/api_http.rs
//
// HTTP-level tests for the public API Router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot.
//
// Covered:
// - GET /health
// - POST /sentiment        (contract shape, labels, 400 variants, 500)
// - POST /sentiment/test   (breakdown shape, 400, 500)

use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::json;
use serde_json::Value as Json;
use tower::ServiceExt as _; // for `oneshot`

use giftlink_sentiment::error::ClassifierError;
use giftlink_sentiment::lexicon::Lexicon;
use giftlink_sentiment::patterns::PatternTable;
use giftlink_sentiment::{api, build_app, AppState, SentimentClassifier, ServiceConfig};

const BODY_LIMIT: usize = 1024 * 1024; // 1MB, safe for tests

/// Same router the binary builds, with defaults (embedded lexicon, no metrics).
fn test_router() -> Router {
    build_app(&ServiceConfig::default()).expect("default app builds")
}

struct BrokenLexicon;

impl Lexicon for BrokenLexicon {
    fn score(&self, _tokens: &[&str]) -> Result<f64, ClassifierError> {
        Err(ClassifierError::LexiconFault("lexicon unavailable".into()))
    }
}

fn broken_router() -> Router {
    let clf = SentimentClassifier::new(Arc::new(BrokenLexicon), PatternTable::default());
    api::router(AppState::new(clf))
}

fn post_json(uri: &str, body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .expect("build POST")
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Json) {
    let resp = app.oneshot(req).await.expect("oneshot");
    let status = resp.status();
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body");
    let v: Json = serde_json::from_slice(&bytes).expect("json body");
    (status, v)
}

async fn classify(sentence: &str) -> Json {
    let (status, v) = send(
        test_router(),
        post_json("/sentiment", json!({ "sentence": sentence }).to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "body: {v}");
    v
}

#[tokio::test]
async fn api_health_returns_200_and_ok_body() {
    let req = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .expect("build GET /health");

    let resp = test_router().oneshot(req).await.expect("oneshot /health");
    assert_eq!(resp.status(), StatusCode::OK, "health should be 200");

    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    assert_eq!(String::from_utf8(bytes).expect("utf8").trim(), "OK");
}

#[tokio::test]
async fn sentiment_returns_contract_fields() {
    let v = classify("This is amazing! I love it!").await;

    // Contract checks for the comment-storage caller
    assert!(v["sentimentScore"].is_number(), "missing 'sentimentScore'");
    assert_eq!(v["sentiment"], "positive");
    assert_eq!(v["debug"]["baseScore"], 3.0);
    assert_eq!(v["debug"]["patternAdjustment"], 1.5);
    assert_eq!(v["sentimentScore"], 4.5);
}

#[tokio::test]
async fn sentiment_labels_canonical_comments() {
    let cases = [
        ("it's too small for my room", "negative", -0.5),
        ("I HATE this", "negative", -3.5),
        ("Is this still available?", "neutral", 0.0),
        ("hello world", "neutral", 0.0),
        ("Great item! Highly recommend!", "positive", 3.5),
    ];
    for (sentence, label, score) in cases {
        let v = classify(sentence).await;
        assert_eq!(v["sentiment"], label, "{sentence:?} -> {v}");
        assert_eq!(v["sentimentScore"], score, "{sentence:?} -> {v}");
    }
}

#[tokio::test]
async fn sentiment_rejects_missing_sentence() {
    let bodies = [
        json!({}).to_string(),
        json!({ "sentence": null }).to_string(),
        json!({ "sentence": "" }).to_string(),
        json!({ "sentence": "   \n\t" }).to_string(),
        json!({ "text": "wrong field" }).to_string(),
        "{not json".to_string(),
    ];
    for b in bodies {
        let (status, v) = send(test_router(), post_json("/sentiment", b.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {b:?}");
        assert_eq!(v, json!({ "error": "No sentence provided" }));
    }
}

#[tokio::test]
async fn sentiment_rejects_body_without_json_content_type() {
    let req = Request::builder()
        .method("POST")
        .uri("/sentiment")
        .body(Body::from(r#"{"sentence":"I love it"}"#))
        .unwrap();
    let (status, v) = send(test_router(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(v["error"], "No sentence provided");
}

#[tokio::test]
async fn sentiment_test_returns_full_breakdown() {
    let (status, v) = send(
        test_router(),
        post_json(
            "/sentiment/test",
            json!({ "sentence": "great idea but too big" }).to_string(),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(v["sentence"], "great idea but too big");
    assert_eq!(v["patternAdjustment"], 0.0);
    assert!(v["baseScore"].is_number());
    assert!(v["finalScore"].is_number());
    assert!(v["sentiment"].is_string());
    assert_eq!(
        v["threshold"],
        json!({ "negative": "< 0", "neutral": "0 to 0.2", "positive": "> 0.2" })
    );

    let patterns = v["patterns"].as_array().expect("patterns array");
    assert_eq!(patterns.len(), 2);
    assert_eq!(patterns[0]["pattern"], "too big");
    assert_eq!(patterns[0]["polarity"], "negative");
    assert_eq!(patterns[0]["weight"], -0.5);
    assert_eq!(patterns[1]["pattern"], "great");
}

#[tokio::test]
async fn sentiment_test_rejects_missing_sentence() {
    let (status, v) = send(test_router(), post_json("/sentiment/test", "{}".into())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(v, json!({ "error": "No sentence provided" }));
}

#[tokio::test]
async fn lexicon_fault_returns_500() {
    let (status, v) = send(
        broken_router(),
        post_json("/sentiment", json!({ "sentence": "I love it" }).to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(v, json!({ "message": "Error performing sentiment analysis" }));

    let (status, v) = send(
        broken_router(),
        post_json("/sentiment/test", json!({ "sentence": "I love it" }).to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let msg = v["error"].as_str().expect("error message");
    assert!(msg.contains("lexicon unavailable"), "got {msg}");
}

#[tokio::test]
async fn missing_input_is_rejected_before_the_lexicon_runs() {
    // Even a broken lexicon yields 400, not 500, for an empty request.
    let (status, _) = send(broken_router(), post_json("/sentiment", "{}".into())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn oversized_body_is_413_not_missing_sentence() {
    // Past axum's 2 MB default body limit; a well-formed sentence, just too long.
    let huge = "lovely ".repeat(400_000);
    for uri in ["/sentiment", "/sentiment/test"] {
        let (status, v) = send(
            test_router(),
            post_json(uri, json!({ "sentence": huge }).to_string()),
        )
        .await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE, "{uri}: {v}");
        assert_ne!(v["error"], "No sentence provided", "{uri}");
    }
}

#[tokio::test]
async fn body_just_under_the_limit_is_classified() {
    let long = "lovely ".repeat(200_000);
    let v = classify(&long).await;
    assert_eq!(v["sentiment"], "positive");
}

#[tokio::test]
async fn metrics_route_is_absent_by_default() {
    let resp = test_router()
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
