pub mod cutoff;
pub mod error;
pub mod handlers;
pub mod state;

use axum::{routing::get, Router};
use state::SharedState;
use tower_http::trace::TraceLayer;

pub fn app(state: SharedState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/count", get(handlers::count_since))
        .layer(TraceLayer::new_for_http())
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        .with_state(state)
}

pub fn build_http_client(config: &state::AppConfig) -> anyhow::Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(config.user_agent.as_str())
        .build()?;
    Ok(client)
}

/// ログ出力の初期化（`RUST_LOG` 未設定なら info）
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
