use crate::cutoff::parse_since;
use crate::error::AppError;
use crate::state::{CountQuery, SharedState};
use autoscroll::LoadConfig;
use axum::{
    extract::{Query, State},
    response::Json,
};
use counter_core::{CountReport, FeedProfile};
use htmlfeed::PagedHtmlSource;
use std::time::Duration;

pub async fn count_since(
    State(state): State<SharedState>,
    Query(params): Query<CountQuery>,
) -> Result<Json<CountReport>, AppError> {
    tracing::info!(
        "Received count request: profile={} since={} (wait_ms={:?}, max_attempts={:?})",
        params.profile,
        params.since,
        params.wait_ms,
        params.max_attempts
    );

    let profile = FeedProfile::from_str(&params.profile)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown profile: {}", params.profile)))?;

    let cutoff = parse_since(&params.since).map_err(|e| AppError::BadRequest(e.to_string()))?;

    if params.max_attempts == Some(0) {
        return Err(AppError::BadRequest(
            "max_attempts must be at least 1".to_string(),
        ));
    }
    let load = LoadConfig {
        wait: params
            .wait_ms
            .map(Duration::from_millis)
            .unwrap_or(state.config.load.wait),
        max_attempts: params
            .max_attempts
            .unwrap_or(state.config.load.max_attempts),
    };

    let source = PagedHtmlSource::new(
        state.http_client.clone(),
        state.config.feed_url(profile),
        profile,
    )
    .with_cookie(state.config.feed_cookie.clone());

    let report = autoscroll::count_since(&source, state.clock.as_ref(), cutoff, &load)
        .await
        .map_err(AppError::Upstream)?;

    Ok(Json(report))
}
