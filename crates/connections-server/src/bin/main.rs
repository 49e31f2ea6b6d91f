use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use connections_server::state::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    let config = ServerConfig::from_env().context("invalid server configuration")?;
    let addr = format!("0.0.0.0:{}", config.port);
    info!(upstream = %config.upstream_url, "using puzzle feed");

    let (app, _state) = connections_server::build_app(config);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!(%addr, "listening");
    println!("Run the client with:");
    println!("  CONNECTIONS_SERVER_URL=http://localhost:{} cargo run -p connections-tui", listener.local_addr()?.port());

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
