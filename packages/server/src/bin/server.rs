use anyhow::Context;
use clap::Parser;
use std::net::SocketAddr;
use tracing::{info, warn};
use yamlstore_remote::{GithubClient, MemoryRemote};
use yamlstore_server::{load_env_file, router, ServerConfig};
use yamlstore_store::StoreExecutor;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    load_env_file(None);
    let config = ServerConfig::parse();
    config.validate()?;
    config.log_summary();

    let addr = SocketAddr::new(config.host, config.port);
    let app = if config.memory {
        let remote = MemoryRemote::new();
        for path in config.file_paths() {
            let location = config.remote_config("", "", "", &path, "");
            if location.owner.is_empty() || location.repo.is_empty() {
                warn!("REPO_OWNER and REPO_NAME are needed to seed the in-memory remote");
                break;
            }
            remote.put_file(&location, "{}\n");
            info!("Seeded in-memory file {}", location.location());
        }
        let executor = StoreExecutor::new(remote).with_retry_policy(config.retry_policy());
        router(executor, config)
    } else {
        let client = GithubClient::new(config.github_client_config())
            .context("failed to build GitHub client")?;
        let executor = StoreExecutor::new(client).with_retry_policy(config.retry_policy());
        router(executor, config)
    };

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Starting server on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
