//! Serve command - runs the HTTP server

use std::net::SocketAddr;

use clap::Args;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};

use crate::api::create_router_with_state;
use crate::config::AppConfig;
use crate::infrastructure::observability::{init_metrics, init_tracing, shutdown_tracing};

/// Overrides applied on top of the loaded configuration
#[derive(Debug, Clone, Default, Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(long)]
    pub port: Option<u16>,

    /// Address to bind
    #[arg(long)]
    pub host: Option<String>,
}

/// Run the HTTP server
pub async fn run(args: ServeArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let (mut config, load_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };
    apply_overrides(&mut config, &args);

    init_tracing(&config.logging, &config.observability.tracing);

    if let Some(e) = load_error {
        warn!(error = %e, "Failed to load configuration, using defaults");
    }

    let state = crate::create_app_state_with_config(&config)?;
    let metrics = init_metrics(&config.observability.metrics);
    let app = create_router_with_state(state, metrics);

    let addr = build_socket_addr(&config)?;
    info!("Starting analytics relay on {}", addr);

    let listener = TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    shutdown_tracing();
    info!("Server shutdown complete");

    Ok(())
}

fn apply_overrides(config: &mut AppConfig, args: &ServeArgs) {
    if let Some(port) = args.port {
        config.server.port = port;
    }

    if let Some(host) = &args.host {
        config.server.host = host.clone();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

fn build_socket_addr(config: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    )))
}
