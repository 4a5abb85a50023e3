use crate::source::FeedSnapshotSource;
use anyhow::{Context, Result};
use chrono::DateTime;
use chrono_tz::Tz;
use counter_core::{Clock, StopReason};
use std::time::Duration;

pub const DEFAULT_WAIT: Duration = Duration::from_millis(800);
pub const DEFAULT_MAX_ATTEMPTS: usize = 30;

/// 追加読み込みループの設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadConfig {
    /// 1 回の追加読み込み要求のあとに待つ時間
    pub wait: Duration,
    /// 追加読み込みの最大回数（暴走防止）
    pub max_attempts: usize,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            wait: DEFAULT_WAIT,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// 読み込みループの終了状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOutcome {
    pub reason: StopReason,
    /// 実行した追加読み込みの回数
    pub attempts: usize,
    /// 最後に観測した読み込み量
    pub extent: u64,
    /// 最後に観測したアイテム数
    pub items: usize,
}

/// `cutoff` より古いアイテムが読み込まれるまで追加読み込みを繰り返す
///
/// 一覧は新しい順に並んでいる前提。末尾アイテムが `cutoff` より古ければ
/// それ以降に数えるべきアイテムは無いので止める。
///
/// 終了条件:
/// - 末尾のラベルが `cutoff` より前 → `FoundOlder`
/// - 一覧が空、または読み込み量が前回から増えていない → `NoGrowth`
/// - `max_attempts` 回に達した → `MaxAttempts`
///
/// 外部からのキャンセル手段は無い。最悪 `max_attempts * wait` かかる。
pub async fn ensure_loaded_past<S>(
    source: &S,
    clock: &dyn Clock,
    cutoff: DateTime<Tz>,
    config: &LoadConfig,
) -> Result<LoadOutcome>
where
    S: FeedSnapshotSource + ?Sized,
{
    let mut last_extent: u64 = 0;
    let mut last_items = 0;

    for attempt in 1..=config.max_attempts {
        // 失敗しても続行する。本当に止まっていれば下の伸び判定で終わる
        if let Err(e) = source.request_more().await {
            tracing::warn!(
                "[autoscroll] Load-more request failed (attempt {}): {:#}",
                attempt,
                e
            );
        }

        tokio::time::sleep(config.wait).await;

        let items = source
            .list_items()
            .await
            .context("autoscroll: failed to list items")?;
        last_items = items.len();

        let Some(tail) = items.last() else {
            tracing::debug!("[autoscroll] No items after attempt {}", attempt);
            return Ok(LoadOutcome {
                reason: StopReason::NoGrowth,
                attempts: attempt,
                extent: last_extent,
                items: 0,
            });
        };

        let now = clock.now();
        match source.raw_label_of(tail) {
            Some(label) => match jpdate::resolve(&label, now) {
                Some(tail_at) if tail_at < cutoff => {
                    tracing::debug!(
                        "[autoscroll] Tail {:?} ({}) is older than cutoff {}",
                        label,
                        tail_at,
                        cutoff
                    );
                    return Ok(LoadOutcome {
                        reason: StopReason::FoundOlder,
                        attempts: attempt,
                        extent: last_extent,
                        items: last_items,
                    });
                }
                Some(_) => {}
                None => {
                    tracing::debug!("[autoscroll] Tail label {:?} is unresolvable", label);
                }
            },
            None => {
                tracing::debug!("[autoscroll] Tail item #{} has no label", tail.position);
            }
        }

        let extent = source
            .current_extent()
            .await
            .context("autoscroll: failed to measure extent")?;
        if extent == last_extent {
            tracing::debug!(
                "[autoscroll] Extent stayed at {} after attempt {}",
                extent,
                attempt
            );
            return Ok(LoadOutcome {
                reason: StopReason::NoGrowth,
                attempts: attempt,
                extent,
                items: last_items,
            });
        }
        last_extent = extent;
    }

    tracing::warn!(
        "[autoscroll] Gave up after {} attempts ({} items loaded)",
        config.max_attempts,
        last_items
    );
    Ok(LoadOutcome {
        reason: StopReason::MaxAttempts,
        attempts: config.max_attempts,
        extent: last_extent,
        items: last_items,
    })
}
