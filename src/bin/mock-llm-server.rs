use std::net::SocketAddr;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use fitplan::mock::{mock_router, MockMode};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // 8081 avoids clashing with the service itself.
    let port = std::env::var("MOCK_LLM_PORT")
        .unwrap_or_else(|_| "8081".to_string())
        .parse::<u16>()
        .map_err(|e| anyhow!("invalid MOCK_LLM_PORT: {e}"))?;

    let mode: MockMode = std::env::var("MOCK_LLM_MODE")
        .unwrap_or_else(|_| "json".to_string())
        .parse()
        .map_err(|e: String| anyhow!(e))?;

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;

    info!("Mock LLM server listening on http://{addr}");
    info!(?mode, "answering every completion the same way");
    info!("Point the service at it with OPENAI_BASE_URL=http://localhost:{port}");

    axum::serve(listener, mock_router(mode, Arc::new(AtomicUsize::new(0)))).await?;
    Ok(())
}
