use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use forward_proxy::config::{load_config, ProxyConfig};
use forward_proxy::lifecycle::signals;
use forward_proxy::observability::logging;
use forward_proxy::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "forward-proxy")]
#[command(about = "Single-hop HTTP forward proxy for testing web filters", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to bind to (overrides the config file).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides the config file).
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Enable debug logging.
    #[arg(long)]
    debug: bool,
}

impl Cli {
    fn into_config(self) -> Result<ProxyConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => ProxyConfig::default(),
        };

        if let Some(host) = self.host {
            config.listener.host = host;
        }
        if let Some(port) = self.port {
            config.listener.port = port;
        }
        if self.debug {
            config.observability.log_level = "debug".to_string();
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::parse().into_config()?;

    logging::init(&config.observability)?;

    tracing::info!(
        bind_address = %config.listener.bind_address(),
        chunk_size = config.streaming.chunk_size,
        connect_timeout_secs = config.timeouts.connect_secs,
        request_timeout_secs = ?config.timeouts.request_secs,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(config.listener.bind_address()).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;
    let server_shutdown = shutdown.subscribe();

    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        if let Err(e) = signals::wait_for_signal().await {
            tracing::error!(error = %e, "Failed to listen for shutdown signals");
        }
        signal_shutdown.trigger();
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
