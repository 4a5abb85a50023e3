pub mod controller;
pub mod counter;
pub mod source;


use anyhow::{Context, Result};
use chrono::DateTime;
use chrono_tz::Tz;
use counter_core::{Clock, CountReport};

pub use controller::{ensure_loaded_past, LoadConfig, LoadOutcome};
pub use counter::count_at_or_after;
pub use source::FeedSnapshotSource;

/// `cutoff` 以降のアイテム数を数える
///
/// 1. 必要なところまで追加読み込み
/// 2. 最後のスナップショットを読み直して数える
pub async fn count_since<S>(
    source: &S,
    clock: &dyn Clock,
    cutoff: DateTime<Tz>,
    config: &LoadConfig,
) -> Result<CountReport>
where
    S: FeedSnapshotSource + ?Sized,
{
    let outcome = ensure_loaded_past(source, clock, cutoff, config).await?;

    let snapshot = source
        .list_items()
        .await
        .context("autoscroll: failed to list final snapshot")?;
    let count = count_at_or_after(source, &snapshot, cutoff, clock.now());

    tracing::info!(
        "Counted {} of {} items since {} (stop={}, attempts={})",
        count,
        snapshot.len(),
        cutoff,
        outcome.reason.as_str(),
        outcome.attempts
    );

    Ok(CountReport {
        count,
        stop_reason: outcome.reason,
        attempts: outcome.attempts,
        items_loaded: snapshot.len(),
        cutoff: cutoff.fixed_offset(),
    })
}
