use crate::source::FeedSnapshotSource;
use chrono::DateTime;
use chrono_tz::Tz;
use counter_core::FeedItem;

/// ラベルが `cutoff` 以降（同時刻を含む）に解決されるアイテムを数える
///
/// ラベルが無い・解釈できないアイテムは数えない。
pub fn count_at_or_after<S>(
    source: &S,
    snapshot: &[FeedItem],
    cutoff: DateTime<Tz>,
    now: DateTime<Tz>,
) -> usize
where
    S: FeedSnapshotSource + ?Sized,
{
    let mut skipped = 0;
    let count = snapshot
        .iter()
        .filter(|item| {
            let resolved = source
                .raw_label_of(item)
                .and_then(|label| jpdate::resolve(&label, now));
            if resolved.is_none() {
                skipped += 1;
            }
            resolved.is_some_and(|at| at >= cutoff)
        })
        .count();

    if skipped > 0 {
        tracing::debug!(
            "[counter] {} of {} items had no usable date label",
            skipped,
            snapshot.len()
        );
    }
    count
}
