// src/config/service.rs
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path, path::PathBuf};

use crate::classifier::ScoreMode;

pub const DEFAULT_CONFIG_PATH: &str = "config/sentiment.toml";
pub const DEFAULT_SERVICE_URL: &str = "http://localhost:3000";
pub const DEFAULT_TIMEOUT_MS: u64 = 3_000;

pub const ENV_CONFIG_PATH: &str = "SENTIMENT_CONFIG_PATH";
pub const ENV_LEXICON_PATH: &str = "SENTIMENT_LEXICON_PATH";
pub const ENV_SCORE_MODE: &str = "SENTIMENT_SCORE_MODE";
pub const ENV_DEBUG_ROUTES: &str = "DEBUG_ROUTES";
pub const ENV_SERVICE_URL: &str = "SENTIMENT_SERVICE_URL";
pub const ENV_TIMEOUT_MS: &str = "SENTIMENT_TIMEOUT_MS";

fn default_service_url() -> String {
    DEFAULT_SERVICE_URL.to_string()
}
fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// AFINN-format file; `None` uses the embedded table.
    pub lexicon_path: Option<PathBuf>,
    pub score_mode: ScoreMode,
    /// Appended after the built-in negative phrases.
    pub extra_negative: Vec<String>,
    /// Appended after the built-in positive phrases.
    pub extra_positive: Vec<String>,
    /// Mount `/metrics`.
    pub debug_routes: bool,
    pub client: ClientConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            lexicon_path: None,
            score_mode: ScoreMode::Sum,
            extra_negative: Vec::new(),
            extra_positive: Vec::new(),
            debug_routes: false,
            client: ClientConfig::default(),
        }
    }
}

/// Caller-side settings used by the comment-storage client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_service_url")]
    pub service_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            service_url: default_service_url(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl ServiceConfig {
    /// Parse a TOML file. Environment overrides are not applied here.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading sentiment config from {}", path.display()))?;
        let cfg: ServiceConfig = toml::from_str(&data)
            .with_context(|| format!("parsing sentiment config {}", path.display()))?;
        Ok(cfg)
    }

    /// Resolution order:
    /// 1) $SENTIMENT_CONFIG_PATH (must exist)
    /// 2) config/sentiment.toml
    /// 3) built-in defaults
    ///
    /// Environment overrides are applied on top in every case.
    pub fn load_default() -> Result<Self> {
        let mut cfg = if let Ok(p) = env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
            }
            Self::load_from_file(&pb)?
        } else if Path::new(DEFAULT_CONFIG_PATH).exists() {
            Self::load_from_file(DEFAULT_CONFIG_PATH)?
        } else {
            Self::default()
        };
        cfg.apply_env_overrides()?;
        Ok(cfg)
    }

    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(p) = non_empty_env(ENV_LEXICON_PATH) {
            self.lexicon_path = Some(PathBuf::from(p));
        }
        if let Some(m) = non_empty_env(ENV_SCORE_MODE) {
            self.score_mode = m.parse::<ScoreMode>().map_err(|e| anyhow!(e))?;
        }
        if let Some(v) = non_empty_env(ENV_DEBUG_ROUTES) {
            self.debug_routes = matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }
        if let Some(url) = non_empty_env(ENV_SERVICE_URL) {
            self.client.service_url = url;
        }
        if let Some(ms) = non_empty_env(ENV_TIMEOUT_MS) {
            self.client.timeout_ms = ms
                .parse::<u64>()
                .with_context(|| format!("{ENV_TIMEOUT_MS} must be milliseconds, got '{ms}'"))?;
        }
        Ok(())
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
