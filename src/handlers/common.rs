pub async fn root() -> &'static str {
    "一覧ページの「指定日時以降の件数」を数えます: GET /count?profile=likes&since=2025-02-01"
}

pub async fn health() -> &'static str {
    "OK"
}
