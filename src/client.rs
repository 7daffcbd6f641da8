// src/client.rs
//! Caller side of the sentiment service, as used by comment storage.
//!
//! Sentiment is best-effort: any failure (connection refused, timeout, non-2xx, bad body)
//! degrades to `neutral` so a comment is always stored.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

use crate::classifier::SentimentLabel;
use crate::config::ClientConfig;
use crate::error::ClientError;

/// Anything that can label a comment. Storage code depends on this, not on HTTP.
#[async_trait]
pub trait SentimentSource: Send + Sync {
    async fn analyze(&self, text: &str) -> Result<SentimentLabel, ClientError>;
}

#[derive(Clone)]
pub struct SentimentClient {
    base_url: String,
    http: Client,
    timeout: Duration,
}

impl SentimentClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: Client::new(),
            timeout: Duration::from_millis(crate::config::service::DEFAULT_TIMEOUT_MS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn from_config(cfg: &ClientConfig) -> Self {
        Self::new(cfg.service_url.clone()).with_timeout(Duration::from_millis(cfg.timeout_ms))
    }

    pub fn endpoint(&self) -> String {
        format!("{}/sentiment", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl SentimentSource for SentimentClient {
    async fn analyze(&self, text: &str) -> Result<SentimentLabel, ClientError> {
        #[derive(Serialize)]
        struct Req<'a> {
            sentence: &'a str,
        }
        #[derive(Deserialize)]
        struct Resp {
            sentiment: SentimentLabel,
        }

        let resp = self
            .http
            .post(self.endpoint())
            .timeout(self.timeout)
            .json(&Req { sentence: text })
            .send()
            .await?
            .error_for_status()?;
        let body: Resp = resp.json().await?;
        Ok(body.sentiment)
    }
}

/// Never fails: logs the upstream problem and answers `neutral`.
pub async fn label_or_neutral(source: &dyn SentimentSource, text: &str) -> SentimentLabel {
    match source.analyze(text).await {
        Ok(label) => label,
        Err(e) => {
            warn!(target: "sentiment", error = %e, "Error analyzing sentiment, defaulting to neutral");
            SentimentLabel::Neutral
        }
    }
}

/// Comment record as persisted by the storage layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaggedComment {
    pub author: String,
    pub comment: String,
    pub sentiment: SentimentLabel,
    pub created_at: DateTime<Utc>,
}

pub async fn tag_comment(
    source: &dyn SentimentSource,
    author: impl Into<String>,
    comment: impl Into<String>,
) -> TaggedComment {
    let comment = comment.into();
    let sentiment = label_or_neutral(source, &comment).await;
    TaggedComment {
        author: author.into(),
        comment,
        sentiment,
        created_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Down;

    #[async_trait]
    impl SentimentSource for Down {
        async fn analyze(&self, _text: &str) -> Result<SentimentLabel, ClientError> {
            Err(ClientError::UpstreamUnavailable("connection refused".into()))
        }
    }

    struct Always(SentimentLabel);

    #[async_trait]
    impl SentimentSource for Always {
        async fn analyze(&self, _text: &str) -> Result<SentimentLabel, ClientError> {
            Ok(self.0)
        }
    }

    #[tokio::test]
    async fn failure_falls_back_to_neutral() {
        assert_eq!(label_or_neutral(&Down, "I hate it").await, SentimentLabel::Neutral);
    }

    #[tokio::test]
    async fn tag_comment_keeps_fields_and_label() {
        let before = Utc::now();
        let c = tag_comment(&Always(SentimentLabel::Negative), "ann", "too small").await;
        assert_eq!(c.author, "ann");
        assert_eq!(c.comment, "too small");
        assert_eq!(c.sentiment, SentimentLabel::Negative);
        assert!(c.created_at >= before);
    }

    #[test]
    fn endpoint_joins_without_double_slash() {
        assert_eq!(
            SentimentClient::new("http://svc:3000/").endpoint(),
            "http://svc:3000/sentiment"
        );
    }

    #[test]
    fn tagged_comment_uses_camel_case() {
        let c = TaggedComment {
            author: "a".into(),
            comment: "b".into(),
            sentiment: SentimentLabel::Neutral,
            created_at: Utc::now(),
        };
        let v = serde_json::to_value(&c).unwrap();
        assert!(v.get("createdAt").is_some());
        assert_eq!(v["sentiment"], "neutral");
    }
}
