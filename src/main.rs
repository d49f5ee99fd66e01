//! Standalone gateway forwarding every request to one downstream target.
//!
//! ```text
//!   client ──▶ HttpServer ──▶ InboundRequest ──▶ RequestForwarder
//!                                                    │ build_outbound
//!                                                    ▼
//!   client ◀── DownstreamResponse (unmodified) ◀── TransportClient ──▶ downstream
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use downstream_forwarder::config::{parse_target, read_config, validate_config, ForwarderConfig};
use downstream_forwarder::lifecycle::signals::trigger_on_signal;
use downstream_forwarder::observability::init_logging;
use downstream_forwarder::{transport, HttpServer, RequestForwarder, Shutdown};

#[derive(Parser)]
#[command(name = "downstream-forwarder")]
#[command(about = "Forward every inbound request to a resolved downstream target", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `downstream.target_url`.
    #[arg(short, long)]
    target: Option<String>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => read_config(path)?,
        None => ForwarderConfig::default(),
    };
    if let Some(target) = cli.target {
        config.downstream.target_url = target;
    }
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }
    if let Err(errors) = validate_config(&config) {
        for error in &errors {
            eprintln!("config: {error}");
        }
        return Err(format!("{} configuration error(s)", errors.len()).into());
    }

    init_logging(&config.observability)?;
    tracing::info!("downstream-forwarder v{} starting", env!("CARGO_PKG_VERSION"));

    let target = parse_target(&config.downstream.target_url)?;
    let transport = transport::from_config(
        &config.transport,
        config.observability.instrument_transport,
    )?;

    tracing::info!(
        bind_address = %config.listener.bind_address,
        target_url = %target,
        transport = ?config.transport.kind,
        max_body_bytes = config.listener.max_body_bytes,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    tokio::spawn(trigger_on_signal(shutdown.clone()));

    let server = HttpServer::new(
        RequestForwarder::new(transport),
        target,
        config.listener.max_body_bytes,
    );
    server.run(listener, shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
