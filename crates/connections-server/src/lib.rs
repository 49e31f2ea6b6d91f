pub mod routes;
pub mod state;

use std::sync::Arc;
use std::time::Duration;

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tracing::debug;

use crate::state::{AppState, ServerConfig};

/// Build a fully configured Router + shared state.
pub fn build_app(config: ServerConfig) -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(config));

    {
        let state = state.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(60));
            loop {
                interval.tick().await;
                let removed = state.evict_expired();
                if removed > 0 {
                    debug!(removed, "evicted cached puzzles");
                }
            }
        });
    }

    let app = Router::new()
        .route("/health", get(routes::health))
        .route("/api/connections/{date}", get(routes::connections))
        .layer(CorsLayer::permissive())
        .with_state(state.clone());

    (app, state)
}
