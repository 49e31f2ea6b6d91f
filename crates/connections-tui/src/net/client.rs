use connections_core::{PuzzleDate, PuzzleFeed};
use thiserror::Error;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info};

const DEFAULT_SERVER_URL: &str = "http://localhost:8080";

pub fn server_url() -> String {
    std::env::var("CONNECTIONS_SERVER_URL").unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string())
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("puzzle request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("puzzle request was dropped")]
    Dropped,
}

/// Fetch the day's puzzle through the proxy.
pub async fn fetch_puzzle(base_url: &str, date: PuzzleDate) -> Result<PuzzleFeed, FetchError> {
    let url = format!(
        "{}/api/connections/{}",
        base_url.trim_end_matches('/'),
        date.path_segment()
    );
    debug!(%url, "requesting puzzle");
    let feed = reqwest::Client::new()
        .get(&url)
        .header("Content-Type", "application/json")
        .send()
        .await?
        .error_for_status()?
        .json::<PuzzleFeed>()
        .await?;
    Ok(feed)
}

/// An in-flight puzzle fetch. Dropping it (or calling `cancel`) aborts the
/// request, and no result is delivered afterwards.
pub struct PuzzleRequest {
    handle: JoinHandle<()>,
    result: Option<oneshot::Receiver<Result<PuzzleFeed, FetchError>>>,
}

impl PuzzleRequest {
    pub fn spawn(base_url: String, date: PuzzleDate) -> Self {
        let (tx, rx) = oneshot::channel();
        let handle = tokio::spawn(async move {
            let result = fetch_puzzle(&base_url, date).await;
            let _ = tx.send(result);
        });
        Self {
            handle,
            result: Some(rx),
        }
    }

    /// Resolves once with the fetch result, then never again.
    pub async fn recv(&mut self) -> Option<Result<PuzzleFeed, FetchError>> {
        let rx = self.result.as_mut()?;
        let result = rx.await.unwrap_or(Err(FetchError::Dropped));
        self.result = None;
        Some(result)
    }

    pub fn is_pending(&self) -> bool {
        self.result.is_some()
    }

    pub fn cancel(&mut self) {
        if self.result.take().is_some() {
            info!("puzzle request cancelled");
        }
        self.handle.abort();
    }
}

impl Drop for PuzzleRequest {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreachable_server_is_an_error() {
        let result = fetch_puzzle("http://127.0.0.1:9", PuzzleDate::new(2024, 6, 9)).await;
        assert!(matches!(result, Err(FetchError::Http(_))));
    }

    #[tokio::test]
    async fn cancelled_request_delivers_nothing() {
        let mut request = PuzzleRequest::spawn(
            "http://127.0.0.1:9".to_string(),
            PuzzleDate::new(2024, 6, 9),
        );
        request.cancel();
        assert!(!request.is_pending());
        assert!(request.recv().await.is_none());
    }
}
