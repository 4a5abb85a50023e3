use crate::helpers::mock_server::{MockServer, SESSION_COOKIE};
use autoscroll::FeedSnapshotSource;
use counter_core::FeedProfile;
use htmlfeed::PagedHtmlSource;

fn likes_source(server: &MockServer) -> PagedHtmlSource {
    PagedHtmlSource::new(
        reqwest::Client::new(),
        format!("{}/likes", server.base_url()),
        FeedProfile::Likes,
    )
}

/// 観点: 読み足すたびにアイテムと読み込み量が増え、位置は通し番号になる
#[tokio::test]
async fn test_request_more_appends_pages() {
    let server = MockServer::start().await;
    let source = likes_source(&server);

    assert!(source.list_items().await.unwrap().is_empty());
    assert_eq!(source.current_extent().await.unwrap(), 0);

    source.request_more().await.unwrap();
    let first_extent = source.current_extent().await.unwrap();
    assert_eq!(source.list_items().await.unwrap().len(), 3);
    assert!(first_extent > 0);

    source.request_more().await.unwrap();
    let items = source.list_items().await.unwrap();
    assert_eq!(items.len(), 5);
    assert!(source.current_extent().await.unwrap() > first_extent);

    let positions: Vec<usize> = items.iter().map(|i| i.position).collect();
    assert_eq!(positions, vec![0, 1, 2, 3, 4]);
    assert_eq!(
        source.raw_label_of(&items[4]).as_deref(),
        Some("月曜日 10:00")
    );
    assert_eq!(source.raw_label_of(&items[2]), None);
}

/// 観点: 空ページで打ち止めになり、以降はリクエストしない
#[tokio::test]
async fn test_exhausted_feed_stops_fetching() {
    let server = MockServer::start().await;
    let source = likes_source(&server);

    for _ in 0..4 {
        source.request_more().await.unwrap();
    }
    assert_eq!(server.hits(), 4);
    let extent = source.current_extent().await.unwrap();

    source.request_more().await.unwrap();
    source.request_more().await.unwrap();

    assert_eq!(server.hits(), 4);
    assert_eq!(source.current_extent().await.unwrap(), extent);
    assert_eq!(source.list_items().await.unwrap().len(), 7);
}

/// 観点: 2xx 以外は打ち止め扱いで、エラーにはしない
#[tokio::test]
async fn test_error_status_ends_feed() {
    let server = MockServer::start().await;
    let source = PagedHtmlSource::new(
        reqwest::Client::new(),
        format!("{}/messages", server.base_url()),
        FeedProfile::Messages,
    );

    source.request_more().await.unwrap();
    source.request_more().await.unwrap();
    source.request_more().await.unwrap();

    assert_eq!(server.hits(), 2);
    let items = source.list_items().await.unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(
        source.raw_label_of(&items[0]).as_deref(),
        Some("今日 10:30")
    );
}

/// 観点: Cookie ヘッダーが送られる
#[tokio::test]
async fn test_cookie_is_sent() {
    let server = MockServer::start().await;
    let url = format!("{}/footprints", server.base_url());

    let anonymous = PagedHtmlSource::new(reqwest::Client::new(), url.clone(), FeedProfile::Footprints);
    anonymous.request_more().await.unwrap();
    assert!(anonymous.list_items().await.unwrap().is_empty());

    let logged_in = PagedHtmlSource::new(reqwest::Client::new(), url, FeedProfile::Footprints)
        .with_cookie(Some(SESSION_COOKIE.to_string()));
    logged_in.request_more().await.unwrap();
    assert_eq!(logged_in.list_items().await.unwrap().len(), 2);
}

/// 観点: 1 ページも読めないまま接続に失敗したら、一覧もエラーになる
#[tokio::test]
async fn test_unreachable_server_is_error() {
    let source = PagedHtmlSource::new(
        reqwest::Client::new(),
        "http://127.0.0.1:9/likes",
        FeedProfile::Likes,
    );

    assert!(source.list_items().await.unwrap().is_empty());
    assert!(source.request_more().await.is_err());

    let err = source.list_items().await.unwrap_err();
    assert!(format!("{:#}", err).contains("127.0.0.1:9/likes"));
}
