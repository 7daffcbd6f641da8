//! Posts a fixed set of comments to a running service's `/sentiment/test` and prints
//! the breakdown. Target comes from `SENTIMENT_SERVICE_URL` (default http://localhost:3000).

use giftlink_sentiment::ServiceConfig;
use serde::Deserialize;
use std::time::Duration;

const CASES: &[&str] = &[
    "it's too small for my room",
    "i don't like the color and design",
    "This is terrible and broken",
    "I hate this, very disappointed",
    "Awful quality, don't buy",
    "Bad condition, not worth it",
    "This is amazing! I love it!",
    "Excellent quality, very happy",
    "Great item! Highly recommend!",
    "Perfect! Exactly what I wanted!",
    "Is this still available?",
    "What are the dimensions?",
    "Can you ship to New York?",
];

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Breakdown {
    base_score: f64,
    pattern_adjustment: f64,
    final_score: f64,
    sentiment: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().with_target(false).init();

    let cfg = ServiceConfig::load_default()?;
    let url = format!(
        "{}/sentiment/test",
        cfg.client.service_url.trim_end_matches('/')
    );
    let http = reqwest::Client::builder()
        .timeout(Duration::from_millis(cfg.client.timeout_ms))
        .build()?;

    println!("probing {url}");
    for sentence in CASES {
        let resp = match http
            .post(&url)
            .json(&serde_json::json!({ "sentence": sentence }))
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) if e.is_connect() => {
                eprintln!("sentiment service is not reachable at {url}: {e}");
                break;
            }
            Err(e) => {
                eprintln!("error testing {sentence:?}: {e}");
                continue;
            }
        };

        match resp.error_for_status() {
            Ok(r) => {
                let b: Breakdown = r.json().await?;
                println!(
                    "{:<8} final={:+.4} (base={:+.4}, patterns={:+.1})  {sentence:?}",
                    b.sentiment.to_uppercase(),
                    b.final_score,
                    b.base_score,
                    b.pattern_adjustment,
                );
            }
            Err(e) => eprintln!("error testing {sentence:?}: {e}"),
        }
    }

    println!("sentiment-probe done");
    Ok(())
}
