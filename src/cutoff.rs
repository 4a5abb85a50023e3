use anyhow::{bail, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use counter_core::SOURCE_TZ;

/// `since` パラメータを `SOURCE_TZ` の時刻に変換する
///
/// 受け付ける形式:
/// - RFC 3339 (`2025-02-01T00:00:00+09:00`)
/// - オフセット無しの日時 (`2025-02-01T09:30`, `2025-02-01 09:30:00`) → 日本時間
/// - 日付だけ (`2025-02-01`) → 日本時間の 0 時
pub fn parse_since(input: &str) -> Result<DateTime<Tz>> {
    let input = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&SOURCE_TZ));
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, fmt) {
            if let Some(dt) = SOURCE_TZ.from_local_datetime(&naive).earliest() {
                return Ok(dt);
            }
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        if let Some(dt) = date
            .and_hms_opt(0, 0, 0)
            .and_then(|naive| SOURCE_TZ.from_local_datetime(&naive).earliest())
        {
            return Ok(dt);
        }
    }

    bail!("Invalid since value: {:?} (expected RFC 3339 or YYYY-MM-DD)", input)
}
