use crate::helpers::client::TestClient;
use axum::http::StatusCode;

/// 観点: /health エンドポイントが 200 OK を返すか
#[tokio::test]
async fn test_health_check() {
    let client = TestClient::new().await;
    let (status, body) = client.get_health().await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
}

/// 観点: / が使い方を返すか
#[tokio::test]
async fn test_root_banner() {
    let client = TestClient::new().await;
    let (status, body) = client.get_root().await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("/count"));
}
