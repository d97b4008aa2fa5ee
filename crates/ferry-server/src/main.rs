use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{Method, header::RANGE};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use ferry_server::config::ServerConfig;
use ferry_server::routes::{self, AppState};
use ferry_streamer::FileStreamer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ferry_server=debug,ferry_streamer=debug,tower_http=debug".into()),
        )
        .init();

    let config = ServerConfig::from_env()?;
    if !config.root.is_dir() {
        anyhow::bail!("FERRY_ROOT {} is not a directory", config.root.display());
    }

    let mut streamer = FileStreamer::new();
    streamer.set_throttle(config.delay, config.chunk_bytes);
    streamer.set_content_type(config.content_type.clone());

    let state = AppState {
        root: config.root.clone(),
        streamer: Arc::new(streamer),
        attachment: config.attachment,
    };

    // CORS — permissive; download clients connect from various origins
    // and need to send Range.
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
        .allow_headers([RANGE])
        .allow_credentials(false);

    let app = routes::router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("ferry file server listening on {}", addr);
    info!(
        "serving {} ({} bytes per chunk, {:?} pause)",
        config.root.display(),
        config.chunk_bytes,
        config.delay
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("failed to install SIGTERM handler");
        tokio::select! {
            _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
