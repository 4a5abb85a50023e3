use autoscroll::LoadConfig;
use counter_core::{Clock, FeedProfile, SystemClock};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct CountQuery {
    pub profile: String,
    pub since: String,
    pub wait_ms: Option<u64>,
    pub max_attempts: Option<usize>,
}

pub type SharedState = AppState;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub http_client: reqwest::Client,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(config: AppConfig, http_client: reqwest::Client) -> Self {
        Self {
            config,
            http_client,
            clock: Arc::new(SystemClock),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// 一覧ページの置き場所。`{feed_base_url}/{profile}?page=N` を読む
    pub feed_base_url: String,
    /// ログイン済みセッションの Cookie
    pub feed_cookie: Option<String>,
    pub user_agent: String,
    pub load: LoadConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            feed_base_url: "http://localhost:8080".to_string(),
            feed_cookie: None,
            user_agent: "FeedCounter/1.0".to_string(),
            load: LoadConfig::default(),
        }
    }
}

fn parsed<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!("Ignoring invalid {}={:?}", key, raw);
            None
        }
    }
}

impl AppConfig {
    /// 環境変数から読む（未設定・不正な値は既定値）
    ///
    /// - `FEED_BASE_URL`
    /// - `FEED_COOKIE`
    /// - `FEED_USER_AGENT`
    /// - `LOAD_WAIT_MS` (既定 800)
    /// - `LOAD_MAX_ATTEMPTS` (既定 30, 0 は無視)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let wait = parsed::<u64>(&lookup, "LOAD_WAIT_MS")
            .map(Duration::from_millis)
            .unwrap_or(defaults.load.wait);
        let max_attempts = parsed::<usize>(&lookup, "LOAD_MAX_ATTEMPTS")
            .filter(|n| *n > 0)
            .unwrap_or(defaults.load.max_attempts);

        Self {
            feed_base_url: lookup("FEED_BASE_URL").unwrap_or(defaults.feed_base_url),
            feed_cookie: lookup("FEED_COOKIE").filter(|c| !c.is_empty()),
            user_agent: lookup("FEED_USER_AGENT").unwrap_or(defaults.user_agent),
            load: LoadConfig { wait, max_attempts },
        }
    }

    pub fn feed_url(&self, profile: FeedProfile) -> String {
        format!(
            "{}/{}",
            self.feed_base_url.trim_end_matches('/'),
            profile.as_str()
        )
    }
}
