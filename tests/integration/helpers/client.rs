use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::TimeZone;
use counter_core::{FixedClock, SOURCE_TZ};
use feed_counter::{
    app,
    state::{AppConfig, AppState, SharedState},
};
use std::sync::Arc;
use tower::ServiceExt; // for oneshot

pub struct TestClient {
    pub router: Router,
    pub state: SharedState,
}

impl TestClient {
    pub async fn new() -> Self {
        Self::new_with_feed_url("http://127.0.0.1:9".to_string(), None)
    }

    /// 「今」を 2025-07-09 (水) 12:00 に固定したアプリ
    pub fn new_with_feed_url(feed_base_url: String, feed_cookie: Option<String>) -> Self {
        let config = AppConfig {
            feed_base_url,
            feed_cookie,
            ..Default::default()
        };
        let state = AppState {
            config,
            http_client: reqwest::Client::new(),
            clock: Arc::new(FixedClock(
                SOURCE_TZ.with_ymd_and_hms(2025, 7, 9, 12, 0, 0).unwrap(),
            )),
        };
        let router = app(state.clone());
        Self { router, state }
    }

    async fn get(&self, uri: &str) -> (StatusCode, Vec<u8>) {
        let request = Request::builder()
            .uri(uri)
            .method("GET")
            .body(Body::empty())
            .unwrap();

        // Router is cheap to clone; oneshot consumes it
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body_bytes.to_vec())
    }

    pub async fn get_health(&self) -> (StatusCode, String) {
        let (status, body) = self.get("/health").await;
        (status, String::from_utf8_lossy(&body).to_string())
    }

    pub async fn get_root(&self) -> (StatusCode, String) {
        let (status, body) = self.get("/").await;
        (status, String::from_utf8_lossy(&body).to_string())
    }

    /// `/count` を呼ぶ。テストを速くするため待ち時間は 1ms にする
    pub async fn get_count(&self, query: &str) -> (StatusCode, serde_json::Value) {
        let (status, body) = self.get(&format!("/count?wait_ms=1&{}", query)).await;

        let body_json: serde_json::Value = if body.is_empty() {
            serde_json::json!(null)
        } else {
            serde_json::from_slice(&body).unwrap_or_else(
                |_| serde_json::json!({ "raw": String::from_utf8_lossy(&body) }),
            )
        };
        (status, body_json)
    }
}
