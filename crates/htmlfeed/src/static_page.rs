use crate::extract::{extract_items, extract_label};
use anyhow::{Context, Result};
use autoscroll::FeedSnapshotSource;
use counter_core::{FeedItem, FeedProfile};
use std::path::Path;

/// 保存済みの一覧ページ（これ以上は読み込めない）
pub struct StaticPageSource {
    profile: FeedProfile,
    items: Vec<FeedItem>,
    extent: u64,
}

impl StaticPageSource {
    pub fn from_html(profile: FeedProfile, html: &str) -> Self {
        Self {
            profile,
            items: extract_items(profile, html),
            extent: html.len() as u64,
        }
    }

    pub async fn from_file(profile: FeedProfile, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let html = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("htmlfeed: failed to read {}", path.display()))?;
        Ok(Self::from_html(profile, &html))
    }
}

#[async_trait::async_trait]
impl FeedSnapshotSource for StaticPageSource {
    async fn list_items(&self) -> Result<Vec<FeedItem>> {
        Ok(self.items.clone())
    }

    fn raw_label_of(&self, item: &FeedItem) -> Option<String> {
        extract_label(self.profile, &item.fragment)
    }

    async fn request_more(&self) -> Result<()> {
        Ok(())
    }

    async fn current_extent(&self) -> Result<u64> {
        Ok(self.extent)
    }
}
