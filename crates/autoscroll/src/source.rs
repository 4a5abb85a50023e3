use anyhow::Result;
use counter_core::FeedItem;

/// 追加読み込みされる一覧の読み出し口
///
/// DOM でも HTML でも API でもよい。コア側はここ越しにしか一覧に触らない。
#[async_trait::async_trait]
pub trait FeedSnapshotSource: Send + Sync {
    /// 現在読み込まれているアイテム（並び順は毎回同じ）
    async fn list_items(&self) -> Result<Vec<FeedItem>>;

    /// アイテムの日時ラベル。見つからなければ `None`
    fn raw_label_of(&self, item: &FeedItem) -> Option<String>;

    /// 追加読み込みを要求する（完了は待たない）
    async fn request_more(&self) -> Result<()>;

    /// 読み込み量の目安。減ることはない
    async fn current_extent(&self) -> Result<u64>;
}
