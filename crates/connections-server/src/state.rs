use std::time::{Duration, Instant};

use dashmap::DashMap;

/// Upstream feed used when `CONNECTIONS_UPSTREAM_URL` is not set.
pub const DEFAULT_UPSTREAM_URL: &str = "https://www.nytimes.com/svc/connections/v2";

/// How long a published puzzle is served from the cache.
pub const CACHE_TTL: Duration = Duration::from_secs(30 * 60);

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Base URL the `{YYYY-MM-DD}.json` file name is appended to.
    pub upstream_url: String,
    pub cache_ttl: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
            cache_ttl: CACHE_TTL,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::default();
        if let Ok(port) = std::env::var("PORT") {
            config.port = port.parse()?;
        }
        if let Ok(url) = std::env::var("CONNECTIONS_UPSTREAM_URL") {
            config.upstream_url = url;
        }
        Ok(config)
    }
}

/// A feed response kept for repeat requests of the same day.
#[derive(Debug, Clone)]
pub struct CachedFeed {
    pub body: serde_json::Value,
    pub fetched_at: Instant,
}

/// Shared application state.
pub struct AppState {
    pub http: reqwest::Client,
    pub config: ServerConfig,
    /// Published puzzles keyed by `YYYY-MM-DD`.
    pub cache: DashMap<String, CachedFeed>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            cache: DashMap::new(),
        }
    }

    pub fn feed_url(&self, slug: &str) -> String {
        format!("{}/{}.json", self.config.upstream_url.trim_end_matches('/'), slug)
    }

    pub fn cached(&self, slug: &str) -> Option<serde_json::Value> {
        let entry = self.cache.get(slug)?;
        if entry.fetched_at.elapsed() > self.config.cache_ttl {
            return None;
        }
        Some(entry.body.clone())
    }

    /// Drop cache entries past their TTL. Returns how many were removed.
    pub fn evict_expired(&self) -> usize {
        let before = self.cache.len();
        let ttl = self.config.cache_ttl;
        self.cache.retain(|_, entry| entry.fetched_at.elapsed() <= ttl);
        before - self.cache.len()
    }
}
