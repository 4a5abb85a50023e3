use std::path::PathBuf;
use std::process::{Command, Output};

const SAVED_LIKES_PAGE: &str = r#"<html><body><ul>
<li class="row"><a href="/u/1">あかね</a><span style="font-family:'MS Gothic';font-size:11px;color:#555">今日 00:00</span></li>
<li class="ad">PR</li>
<li class="row"><a href="/u/2">ゆう</a><span style="font-size:11px;color:#555">3月5日 20:00</span></li>
</ul></body></html>"#;

fn saved_page(name: &str, html: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("{}_{}.html", name, std::process::id()));
    std::fs::write(&path, html).unwrap();
    path
}

fn run_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_count_since"))
        .args(args)
        .env("LOAD_WAIT_MS", "1")
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to run count_since")
}

/// 観点: 保存したページを渡すと、その中の件数を数えて表示する
#[test]
fn test_cli_counts_saved_page() {
    let path = saved_page("count_cli_likes", SAVED_LIKES_PAGE);

    let output = run_cli(&["likes", "2000-01-01", path.to_str().unwrap()]);
    std::fs::remove_file(&path).ok();

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.contains("since 以降の件数: 2"), "{}", stdout);
    assert!(stdout.contains("読み込み 3 件"), "{}", stdout);
    assert!(stdout.contains("停止理由 no_growth"), "{}", stdout);
}

#[test]
fn test_cli_rejects_bad_arguments() {
    let output = run_cli(&[]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage"));

    let output = run_cli(&["timeline", "2000-01-01"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("timeline"));
}

/// 観点: 存在しないファイルはエラー終了
#[test]
fn test_cli_missing_file_fails() {
    let output = run_cli(&["likes", "2000-01-01", "/nonexistent/saved_page.html"]);
    assert!(!output.status.success());
}
