use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use connections_core::PuzzleFeed;
use connections_server::state::ServerConfig;
use serde_json::json;
use tokio::net::TcpListener;

/// Stub of the upstream feed. Counts requests and records the last file name.
#[derive(Default)]
struct Upstream {
    hits: AtomicUsize,
    last_file: std::sync::Mutex<Option<String>>,
}

async fn upstream_feed(
    State(upstream): State<Arc<Upstream>>,
    Path(file): Path<String>,
) -> Json<serde_json::Value> {
    upstream.hits.fetch_add(1, Ordering::SeqCst);
    *upstream.last_file.lock().unwrap() = Some(file.clone());

    if file == "2099-01-01.json" {
        return Json(json!({ "status": "ERROR", "errors": ["Not found"] }));
    }
    Json(json!({
        "status": "OK",
        "id": 412,
        "print_date": file.trim_end_matches(".json"),
        "editor": "Test Editor",
        "categories": [
            { "title": "FISH", "cards": [
                { "content": "BASS", "position": 0 },
                { "content": "FLOUNDER", "position": 1 },
                { "content": "SALMON", "position": 2 },
                { "content": "TROUT", "position": 3 }
            ]}
        ]
    }))
}

async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    tokio::time::sleep(Duration::from_millis(50)).await;
    format!("http://127.0.0.1:{}", port)
}

/// Start a stub upstream and a proxy pointed at it. Returns (proxy base, upstream).
async fn start_server() -> (String, Arc<Upstream>) {
    let upstream = Arc::new(Upstream::default());
    let upstream_app = Router::new()
        .route("/v2/{file}", get(upstream_feed))
        .with_state(upstream.clone());
    let upstream_base = serve(upstream_app).await;

    let (app, _state) = connections_server::build_app(ServerConfig {
        upstream_url: format!("{}/v2", upstream_base),
        ..ServerConfig::default()
    });
    (serve(app).await, upstream)
}

// ── Tests ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_health() {
    let (base, _) = start_server().await;
    let resp = reqwest::get(format!("{}/health", base))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(resp, "ok");
}

#[tokio::test]
async fn test_proxies_feed_with_padded_date() {
    let (base, upstream) = start_server().await;

    let resp = reqwest::get(format!("{}/api/connections/2024-6-9", base))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let content_type = resp.headers()["content-type"].to_str().unwrap().to_string();
    assert!(content_type.starts_with("application/json"));

    let feed: PuzzleFeed = resp.json().await.unwrap();
    assert!(feed.is_ok());
    assert_eq!(feed.print_date, "2024-06-09");
    assert_eq!(feed.categories[0].cards.len(), 4);
    assert_eq!(
        upstream.last_file.lock().unwrap().as_deref(),
        Some("2024-06-09.json")
    );
}

#[tokio::test]
async fn test_malformed_dates_never_reach_upstream() {
    let (base, upstream) = start_server().await;
    let client = reqwest::Client::new();

    for bad in ["24-6-9", "2024-123-9", "2024-6-", "2024-6", "2024-06-091", "abcd-1-1"] {
        let resp = client
            .get(format!("{}/api/connections/{}", base, bad))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 400, "date {} should be rejected", bad);
    }
    assert_eq!(upstream.hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_published_puzzle_is_cached() {
    let (base, upstream) = start_server().await;

    for _ in 0..3 {
        let resp = reqwest::get(format!("{}/api/connections/2024-07-29", base))
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
    }
    assert_eq!(upstream.hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_unpublished_puzzle_passes_through_uncached() {
    let (base, upstream) = start_server().await;

    for _ in 0..2 {
        let body: serde_json::Value = reqwest::get(format!("{}/api/connections/2099-1-1", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["status"], "ERROR");
    }
    assert_eq!(upstream.hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_unreachable_upstream_is_bad_gateway() {
    // Bind then drop a listener to get a port nothing is serving.
    let dead = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap().port()
    };
    let (app, _state) = connections_server::build_app(ServerConfig {
        upstream_url: format!("http://127.0.0.1:{}/v2", dead),
        ..ServerConfig::default()
    });
    let base = serve(app).await;

    let resp = reqwest::get(format!("{}/api/connections/2024-6-9", base))
        .await
        .unwrap();
    assert_eq!(resp.status(), 502);
}
