use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::{debug, info, warn};

use connections_core::date::PuzzleDate;
use connections_core::feed::STATUS_OK;

use crate::state::{AppState, CachedFeed};

// ── Health ──────────────────────────────────────────────────────────────

pub async fn health() -> &'static str {
    "ok"
}

// ── Puzzle feed proxy ───────────────────────────────────────────────────

/// `GET /api/connections/{Y-M-D}`: the day's feed, passed through as is.
pub async fn connections(
    State(state): State<Arc<AppState>>,
    Path(date): Path<String>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let date = PuzzleDate::parse_path(&date).map_err(|e| {
        debug!(date = %date, error = %e, "rejected puzzle date");
        StatusCode::BAD_REQUEST
    })?;
    let slug = date.feed_slug();

    if let Some(body) = state.cached(&slug) {
        debug!(date = %slug, "serving cached puzzle");
        return Ok(Json(body));
    }

    let url = state.feed_url(&slug);
    let body: serde_json::Value = state
        .http
        .get(&url)
        .send()
        .await
        .map_err(|e| {
            warn!(url = %url, error = %e, "upstream request failed");
            StatusCode::BAD_GATEWAY
        })?
        .json()
        .await
        .map_err(|e| {
            warn!(url = %url, error = %e, "upstream returned invalid JSON");
            StatusCode::BAD_GATEWAY
        })?;

    if body["status"].as_str() == Some(STATUS_OK) {
        info!(date = %slug, "cached published puzzle");
        state.cache.insert(
            slug,
            CachedFeed {
                body: body.clone(),
                fetched_at: Instant::now(),
            },
        );
    }

    Ok(Json(body))
}
