use feed_counter::app;
use feed_counter::state::{AppConfig, AppState};
use std::net::SocketAddr;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    feed_counter::init_tracing();

    tracing::info!("Log initialized");

    let config = AppConfig::from_env();
    tracing::info!(
        "Feed pages at {} (wait={:?}, max_attempts={})",
        config.feed_base_url,
        config.load.wait,
        config.load.max_attempts
    );
    if config.feed_cookie.is_none() {
        tracing::warn!("FEED_COOKIE is not set. Pages that need a login will look empty.");
    }

    let http_client = feed_counter::build_http_client(&config)?;
    let app_state = AppState::new(config, http_client);

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!("Feed counter listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let router = app(app_state);
    axum::serve(listener, router).await?;

    Ok(())
}
