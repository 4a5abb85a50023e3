//! 一覧ページに表示される日本語の相対日時ラベルを絶対時刻に変換する
//!
//! 対応する形式:
//! - `今日 14:30`
//! - `水 09:10` / `水曜日 09:10` （1〜6 日前の同じ曜日）
//! - `3月5日 20:00` （未来になる場合は前年扱い）
//!
//! どの形式にも当てはまらないラベルは `None`（エラーではない）。

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Weekday};
use chrono_tz::Tz;
use regex::Regex;
use std::sync::OnceLock;

/// 曜日ラベルを遡って探す最大日数
pub const WEEKDAY_LOOKBACK_DAYS: i64 = 6;

const TODAY_MARKER: &str = "今日";

static TIME_REGEX: OnceLock<Regex> = OnceLock::new();
static WEEKDAY_REGEX: OnceLock<Regex> = OnceLock::new();
static MONTH_DAY_REGEX: OnceLock<Regex> = OnceLock::new();

fn time_regex() -> &'static Regex {
    TIME_REGEX.get_or_init(|| Regex::new(r"(\d{1,2}):(\d{2})").unwrap())
}

fn weekday_regex() -> &'static Regex {
    WEEKDAY_REGEX.get_or_init(|| Regex::new(r"^([月火水木金土日])(?:曜日)?").unwrap())
}

fn month_day_regex() -> &'static Regex {
    MONTH_DAY_REGEX.get_or_init(|| Regex::new(r"(\d{1,2})月(\d{1,2})日").unwrap())
}

/// ラベルが表す日付部分の形
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelShape {
    Today,
    Weekday(Weekday),
    MonthDay { month: u32, day: u32 },
}

/// 「今」に依存しない段階までパースしたラベル
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedLabel {
    pub shape: LabelShape,
    pub time: NaiveTime,
}

fn weekday_from_kanji(c: &str) -> Option<Weekday> {
    match c {
        "日" => Some(Weekday::Sun),
        "月" => Some(Weekday::Mon),
        "火" => Some(Weekday::Tue),
        "水" => Some(Weekday::Wed),
        "木" => Some(Weekday::Thu),
        "金" => Some(Weekday::Fri),
        "土" => Some(Weekday::Sat),
        _ => None,
    }
}

/// ラベルを形と時刻に分解する（純粋関数）
///
/// 優先順位:
/// 1. `HH:MM` が無ければ即 `None`
/// 2. `今日` で始まる
/// 3. 曜日（`曜日` は省略可）で始まる
/// 4. `M月D日` を含む
pub fn parse_label(label: &str) -> Option<ParsedLabel> {
    let label = label.trim();

    let caps = time_regex().captures(label)?;
    let hour: u32 = caps[1].parse().ok()?;
    let minute: u32 = caps[2].parse().ok()?;
    let time = NaiveTime::from_hms_opt(hour, minute, 0)?;

    if label.starts_with(TODAY_MARKER) {
        return Some(ParsedLabel {
            shape: LabelShape::Today,
            time,
        });
    }

    if let Some(caps) = weekday_regex().captures(label) {
        if let Some(weekday) = weekday_from_kanji(&caps[1]) {
            return Some(ParsedLabel {
                shape: LabelShape::Weekday(weekday),
                time,
            });
        }
    }

    if let Some(caps) = month_day_regex().captures(label) {
        let month: u32 = caps[1].parse().ok()?;
        let day: u32 = caps[2].parse().ok()?;
        return Some(ParsedLabel {
            shape: LabelShape::MonthDay { month, day },
            time,
        });
    }

    None
}

fn at_local(tz: &Tz, date: NaiveDate, time: NaiveTime) -> Option<DateTime<Tz>> {
    tz.from_local_datetime(&date.and_time(time)).earliest()
}

impl ParsedLabel {
    /// 基準時刻 `now` に対して絶対時刻を決める
    pub fn anchor(&self, now: DateTime<Tz>) -> Option<DateTime<Tz>> {
        let tz = now.timezone();
        let today = now.date_naive();

        match self.shape {
            LabelShape::Today => at_local(&tz, today, self.time),
            LabelShape::Weekday(weekday) => (1..=WEEKDAY_LOOKBACK_DAYS)
                .map(|offset| today - Duration::days(offset))
                .find(|date| date.weekday() == weekday)
                .and_then(|date| at_local(&tz, date, self.time)),
            LabelShape::MonthDay { month, day } => {
                let in_year = |year: i32| {
                    NaiveDate::from_ymd_opt(year, month, day)
                        .and_then(|date| at_local(&tz, date, self.time))
                };
                // 今年の日付が未来になる（または今年に存在しない 2/29）なら前年
                match in_year(now.year()) {
                    Some(t) if t <= now => Some(t),
                    _ => in_year(now.year() - 1),
                }
            }
        }
    }
}

/// ラベルを `now` 基準の絶対時刻に変換する。解釈できなければ `None`
pub fn resolve(label: &str, now: DateTime<Tz>) -> Option<DateTime<Tz>> {
    parse_label(label)?.anchor(now)
}
