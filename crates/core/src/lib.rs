use chrono::{DateTime, FixedOffset, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// 日時ラベルを解釈するタイムゾーン（サイトは日本向けなので固定）
pub const SOURCE_TZ: Tz = chrono_tz::Asia::Tokyo;

/// スナップショット中の 1 アイテム
///
/// `fragment` はアイテム全体のマークアップ。日時ラベルの取り出し方は
/// プロファイルごとに違うので、ここではまだ解釈しない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedItem {
    pub position: usize,
    pub fragment: String,
}

/// カウント対象の一覧ページの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedProfile {
    /// いいね一覧: すべての `<li>` がアイテム
    Likes,
    /// メッセージ欄: `<li id="li_friend_…">` がアイテム
    Messages,
    /// 足跡: 日時 `<span>` を持つ `<li>` だけがアイテム
    Footprints,
}

impl FeedProfile {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "likes" => Some(Self::Likes),
            "messages" => Some(Self::Messages),
            "footprints" => Some(Self::Footprints),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Likes => "likes",
            Self::Messages => "messages",
            Self::Footprints => "footprints",
        }
    }
}

/// 追加読み込みを止めた理由
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// 末尾アイテムが cutoff より古くなった
    FoundOlder,
    /// 伸びなくなった（データ切れ / 応答なし / 空）
    NoGrowth,
    /// 試行回数の上限
    MaxAttempts,
}

impl StopReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FoundOlder => "found_older",
            Self::NoGrowth => "no_growth",
            Self::MaxAttempts => "max_attempts",
        }
    }
}

/// 1 回の「cutoff 以降を数える」問い合わせの結果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountReport {
    pub count: usize,
    pub stop_reason: StopReason,
    pub attempts: usize,
    pub items_loaded: usize,
    pub cutoff: DateTime<FixedOffset>,
}

/// 基準となる「現在時刻」の供給元
///
/// 日付をまたぐ長い読み込みでも正しく解釈できるよう、毎回問い合わせる。
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Tz>;
}

/// 実時間を `SOURCE_TZ` で返す
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Tz> {
        Utc::now().with_timezone(&SOURCE_TZ)
    }
}

/// テストや再計算用の固定時刻
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Tz>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Tz> {
        self.0
    }
}
