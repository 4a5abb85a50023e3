use crate::extract::{extract_items, extract_label};
use anyhow::{anyhow, Context, Result};
use autoscroll::FeedSnapshotSource;
use counter_core::{FeedItem, FeedProfile};
use reqwest::Client;
use tokio::sync::Mutex;

#[derive(Debug, Default)]
struct PageState {
    next_page: u32,
    items: Vec<FeedItem>,
    bytes: u64,
    exhausted: bool,
    /// 直近のページ取得の失敗。次に取得できれば消える
    last_error: Option<String>,
}

/// `?page=N` で続きを返す一覧ページを、1 ページずつ読み足していくソース
///
/// ブラウザで最下部までスクロールする代わりに次のページを取りに行く。
/// 読み込み量はこれまでに取り込んだアイテムのバイト数（ページの高さの代わり）。
///
/// 1 件も読めないうちに取得が失敗していると `list_items` がそのエラーを返す。
/// 「一覧が空」と「サーバーに届かない」を区別するため。
pub struct PagedHtmlSource {
    client: Client,
    base_url: String,
    profile: FeedProfile,
    cookie: Option<String>,
    state: Mutex<PageState>,
}

impl PagedHtmlSource {
    pub fn new(client: Client, base_url: impl Into<String>, profile: FeedProfile) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            profile,
            cookie: None,
            state: Mutex::new(PageState {
                next_page: 1,
                ..Default::default()
            }),
        }
    }

    /// ログインが必要なページ用の Cookie ヘッダー
    pub fn with_cookie(mut self, cookie: Option<String>) -> Self {
        self.cookie = cookie.filter(|c| !c.is_empty());
        self
    }

    async fn fetch_page(&self, page: u32) -> Result<Option<String>> {
        let mut req = self
            .client
            .get(&self.base_url)
            .query(&[("page", page.to_string())]);
        if let Some(cookie) = &self.cookie {
            req = req.header(reqwest::header::COOKIE, cookie);
        }

        let res = req
            .send()
            .await
            .with_context(|| format!("htmlfeed: request for page {} failed", page))?;

        if !res.status().is_success() {
            tracing::debug!(
                "[htmlfeed] Page {} returned {}; treating as end of feed",
                page,
                res.status()
            );
            return Ok(None);
        }

        let body = res
            .text()
            .await
            .with_context(|| format!("htmlfeed: failed to read page {}", page))?;
        Ok(Some(body))
    }
}

#[async_trait::async_trait]
impl FeedSnapshotSource for PagedHtmlSource {
    async fn list_items(&self) -> Result<Vec<FeedItem>> {
        let state = self.state.lock().await;
        if state.items.is_empty() {
            if let Some(err) = &state.last_error {
                return Err(anyhow!(
                    "htmlfeed: no page could be loaded from {}: {}",
                    self.base_url,
                    err
                ));
            }
        }
        Ok(state.items.clone())
    }

    fn raw_label_of(&self, item: &FeedItem) -> Option<String> {
        extract_label(self.profile, &item.fragment)
    }

    async fn request_more(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.exhausted {
            return Ok(());
        }

        let page = state.next_page;
        let fetched = match self.fetch_page(page).await {
            Ok(fetched) => fetched,
            Err(e) => {
                state.last_error = Some(format!("{:#}", e));
                return Err(e);
            }
        };
        state.last_error = None;

        let Some(body) = fetched else {
            state.exhausted = true;
            return Ok(());
        };

        let fresh = extract_items(self.profile, &body);
        if fresh.is_empty() {
            tracing::debug!("[htmlfeed] Page {} has no items; end of feed", page);
            state.exhausted = true;
            return Ok(());
        }

        tracing::debug!("[htmlfeed] Page {}: {} items", page, fresh.len());
        for item in fresh {
            let position = state.items.len();
            state.bytes += item.fragment.len() as u64;
            state.items.push(FeedItem {
                position,
                fragment: item.fragment,
            });
        }
        state.next_page += 1;
        Ok(())
    }

    async fn current_extent(&self) -> Result<u64> {
        Ok(self.state.lock().await.bytes)
    }
}
