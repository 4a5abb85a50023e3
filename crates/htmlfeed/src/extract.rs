//! 一覧ページの HTML からアイテムと日時ラベルを取り出す
//!
//! ページはサーバー側で生成された素朴なマークアップなので、
//! DOM は組み立てず、`li` / `span` / `div` の開始・終了タグだけを
//! 正規表現で拾って入れ子を数える。
//!
//! | profile      | アイテム                           | 日時ラベル                                  |
//! |--------------|------------------------------------|---------------------------------------------|
//! | `likes`      | すべての `<li>`                    | `font-size:11px` かつ `color:#555` の span  |
//! | `footprints` | 上の span を持つ `<li>` だけ        | 同上                                        |
//! | `messages`   | `id="li_friend_…"` の `<li>`       | `right:0` の div 内の最初の span            |

use counter_core::{FeedItem, FeedProfile};
use regex::Regex;
use std::sync::OnceLock;

const FRIEND_ID_PREFIX: &str = "li_friend_";

static ELEMENT_TAG_REGEX: OnceLock<Regex> = OnceLock::new();
static ID_REGEX: OnceLock<Regex> = OnceLock::new();
static STYLE_REGEX: OnceLock<Regex> = OnceLock::new();
static TAG_REGEX: OnceLock<Regex> = OnceLock::new();

/// `<li ...>` `</span>` など。属性値の中の `>` は飛ばす
fn element_tag_regex() -> &'static Regex {
    ELEMENT_TAG_REGEX.get_or_init(|| {
        Regex::new(r#"(?i)<(/?)(li|span|div)\b((?:[^>"']|"[^"]*"|'[^']*')*)>"#).unwrap()
    })
}

fn id_regex() -> &'static Regex {
    ID_REGEX.get_or_init(|| {
        Regex::new(r#"(?i)(?:^|\s)id\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap()
    })
}

fn style_regex() -> &'static Regex {
    STYLE_REGEX.get_or_init(|| {
        Regex::new(r#"(?i)(?:^|\s)style\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap()
    })
}

fn tag_regex() -> &'static Regex {
    TAG_REGEX.get_or_init(|| Regex::new(r#"<(?:[^>"']|"[^"]*"|'[^']*')*>"#).unwrap())
}

/// 対応する終了タグまでを含む 1 要素
#[derive(Debug, Clone, Copy)]
struct Element<'a> {
    start: usize,
    attrs: &'a str,
    inner: &'a str,
    outer: &'a str,
}

/// `name` 要素を開始タグの出現順に取り出す
///
/// 同名タグの入れ子は深さを数えて対応を取る。閉じられていない要素は捨てる。
fn elements<'a>(html: &'a str, name: &str) -> Vec<Element<'a>> {
    // (開始タグの位置, 属性, 中身の開始位置)
    let mut open: Vec<(usize, &'a str, usize)> = Vec::new();
    let mut found = Vec::new();

    for caps in element_tag_regex().captures_iter(html) {
        if !caps[2].eq_ignore_ascii_case(name) {
            continue;
        }
        let (Some(tag), Some(attrs)) = (caps.get(0), caps.get(3)) else {
            continue;
        };

        if caps[1].is_empty() {
            if attrs.as_str().trim_end().ends_with('/') {
                continue;
            }
            open.push((tag.start(), attrs.as_str(), tag.end()));
        } else if let Some((start, attrs, inner_start)) = open.pop() {
            found.push(Element {
                start,
                attrs,
                inner: &html[inner_start..tag.start()],
                outer: &html[start..tag.end()],
            });
        }
    }

    found.sort_by_key(|e| e.start);
    found
}

fn attr_value<'a>(re: &Regex, attrs: &'a str) -> Option<&'a str> {
    let caps = re.captures(attrs)?;
    caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str())
}

/// style 属性を空白抜き・小文字で返す（`font-size: 11px` も拾うため）
fn normalized_style(attrs: &str) -> Option<String> {
    let style = attr_value(style_regex(), attrs)?;
    Some(
        style
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase(),
    )
}

/// タグを除き、よく出る実体参照だけ戻して前後の空白を落とす
fn inner_text(html: &str) -> String {
    let stripped = tag_regex().replace_all(html, "");
    stripped
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
        .trim()
        .to_string()
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// `font-size:11px` と `color:#555` を両方持つ span の中身
fn styled_span_label(fragment: &str) -> Option<String> {
    elements(fragment, "span")
        .into_iter()
        .find(|span| {
            normalized_style(span.attrs)
                .is_some_and(|style| style.contains("font-size:11px") && style.contains("color:#555"))
        })
        .map(|span| inner_text(span.inner))
}

/// 右寄せ (`right:0`) の div に入っている最初の span の中身
fn right_aligned_span_label(fragment: &str) -> Option<String> {
    elements(fragment, "div")
        .into_iter()
        .filter(|div| normalized_style(div.attrs).is_some_and(|style| style.contains("right:0")))
        .find_map(|div| {
            elements(div.inner, "span")
                .first()
                .map(|span| inner_text(span.inner))
        })
}

fn is_friend_item(li_attrs: &str) -> bool {
    attr_value(id_regex(), li_attrs).is_some_and(|id| id.starts_with(FRIEND_ID_PREFIX))
}

/// アイテムのマークアップから日時ラベルを取り出す
pub fn extract_label(profile: FeedProfile, fragment: &str) -> Option<String> {
    let label = match profile {
        FeedProfile::Likes | FeedProfile::Footprints => styled_span_label(fragment),
        FeedProfile::Messages => right_aligned_span_label(fragment),
    }?;
    non_empty(label)
}

/// HTML から、プロファイルに合うアイテムを出現順に取り出す
///
/// `position` は 0 始まりで振り直す。入れ子の `<li>` もそれぞれ 1 アイテムになる。
pub fn extract_items(profile: FeedProfile, html: &str) -> Vec<FeedItem> {
    elements(html, "li")
        .into_iter()
        .filter(|li| match profile {
            FeedProfile::Likes => true,
            FeedProfile::Messages => is_friend_item(li.attrs),
            FeedProfile::Footprints => styled_span_label(li.inner).is_some(),
        })
        .enumerate()
        .map(|(position, li)| FeedItem {
            position,
            fragment: li.outer.to_string(),
        })
        .collect()
}
