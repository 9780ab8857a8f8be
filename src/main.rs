use anyhow::Result;
use clap::Parser;
use greenroom::config::RelayMode;
use greenroom::relay::{spawn_pump, LocalRelay, NatsRelay, Relay};
use greenroom::storage::{BlobStore, S3Store};
use greenroom::{create_router, AppState, Config};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Parser)]
#[command(
    name = "greenroom",
    about = "Session coordination server for synchronized group recordings"
)]
struct Args {
    /// Configuration file, overridden by GREENROOM_* environment variables
    #[arg(long, default_value = "config/greenroom")]
    config: String,

    /// Override the configured bind address
    #[arg(long)]
    bind: Option<String>,

    /// Override the configured port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let mut cfg = Config::load(&args.config)?;
    if let Some(bind) = args.bind {
        cfg.service.http.bind = bind;
    }
    if let Some(port) = args.port {
        cfg.service.http.port = port;
    }

    info!("{} starting", cfg.service.name);

    let relay: Arc<dyn Relay> = match cfg.relay.mode {
        RelayMode::Local => {
            info!("Using single-process relay");
            Arc::new(LocalRelay::new())
        }
        RelayMode::Nats => {
            let url = cfg
                .relay
                .nats_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("relay.nats_url missing"))?;
            Arc::new(NatsRelay::connect(url, cfg.relay.subject_prefix.clone()).await?)
        }
    };

    let store: Arc<dyn BlobStore> = Arc::new(S3Store::connect(&cfg.storage).await?);

    let state = AppState::new(relay, store);
    spawn_pump(Arc::clone(&state.relay), Arc::clone(&state.fanout)).await?;

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, create_router(state)).await?;

    Ok(())
}
