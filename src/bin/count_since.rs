use anyhow::{Context, Result};
use autoscroll::count_since;
use counter_core::{CountReport, FeedProfile, SystemClock};
use dotenv::dotenv;
use feed_counter::cutoff::parse_since;
use feed_counter::state::AppConfig;
use htmlfeed::{PagedHtmlSource, StaticPageSource};
use std::env;

const USAGE: &str = "Usage: count_since <likes|messages|footprints> <since> [saved_page.html]";

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    feed_counter::init_tracing();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("{}", USAGE);
        std::process::exit(1);
    }

    let profile = FeedProfile::from_str(&args[1])
        .with_context(|| format!("Unknown profile '{}'\n{}", args[1], USAGE))?;
    let cutoff = parse_since(&args[2])?;
    let config = AppConfig::from_env();
    let clock = SystemClock;

    let report: CountReport = match args.get(3) {
        Some(path) => {
            println!("Counting {} in {} since {}...", profile.as_str(), path, cutoff);
            let source = StaticPageSource::from_file(profile, path).await?;
            count_since(&source, &clock, cutoff, &config.load).await?
        }
        None => {
            let url = config.feed_url(profile);
            println!("Counting {} at {} since {}...", profile.as_str(), url, cutoff);
            let client = feed_counter::build_http_client(&config)?;
            let source = PagedHtmlSource::new(client, url, profile)
                .with_cookie(config.feed_cookie.clone());
            count_since(&source, &clock, cutoff, &config.load).await?
        }
    };

    println!(
        "since 以降の件数: {} (読み込み {} 件, 停止理由 {}, 試行 {} 回)",
        report.count,
        report.items_loaded,
        report.stop_reason.as_str(),
        report.attempts
    );

    Ok(())
}
