use clap::Parser;
use std::sync::Arc;

use axum::http::Method;
use downstream_forwarder::config::{parse_target, TransportConfig, TransportKind};
use downstream_forwarder::transport::{HyperTransport, ReqwestTransport, TransportClient};
use downstream_forwarder::{InboundRequest, RequestForwarder};

#[derive(Parser)]
#[command(name = "forward-cli")]
#[command(about = "Forward a single request to a downstream target and print the response", long_about = None)]
struct Cli {
    /// Downstream target (scheme, host, port, optional base path).
    #[arg(short, long)]
    target: String,

    #[arg(short = 'X', long, default_value = "GET")]
    method: String,

    #[arg(short, long, default_value = "/")]
    path: String,

    /// Header as `Name: value`; repeatable.
    #[arg(short = 'H', long = "header")]
    headers: Vec<String>,

    /// Cookie as `name=value`; repeatable.
    #[arg(long = "cookie")]
    cookies: Vec<String>,

    /// Query parameter as `key=value` or bare `key`; repeatable.
    #[arg(short, long = "query")]
    queries: Vec<String>,

    /// Request body.
    #[arg(short, long)]
    data: Option<String>,

    #[arg(long)]
    content_type: Option<String>,

    /// Use the reqwest transport (implied by an https target).
    #[arg(long)]
    tls: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let target = parse_target(&cli.target)?;

    let mut builder = InboundRequest::builder(Method::from_bytes(cli.method.as_bytes())?, cli.path);
    for header in &cli.headers {
        let (name, value) = header
            .split_once(':')
            .ok_or_else(|| format!("header '{header}' is not 'Name: value'"))?;
        builder = builder.header(name.trim(), value.trim());
    }
    for cookie in &cli.cookies {
        let (name, value) = cookie
            .split_once('=')
            .ok_or_else(|| format!("cookie '{cookie}' is not 'name=value'"))?;
        builder = builder.cookie(name, value);
    }
    for query in &cli.queries {
        builder = match query.split_once('=') {
            Some((key, value)) => builder.query(key, value),
            None => builder.query_flag(query.as_str()),
        };
    }
    if let Some(data) = cli.data {
        builder = builder.body(data, cli.content_type.as_deref());
    }

    let mut config = TransportConfig::default();
    let transport: Arc<dyn TransportClient> = if cli.tls || target.scheme() == "https" {
        config.kind = TransportKind::Reqwest;
        Arc::new(ReqwestTransport::new(&config)?)
    } else {
        Arc::new(HyperTransport::new(&config))
    };

    let response = RequestForwarder::new(transport)
        .forward(&builder.build(), &target)
        .await?;

    println!("{}", response.status);
    for (name, value) in &response.headers {
        println!("{}: {}", name, value.to_str().unwrap_or("<binary>"));
    }
    println!();
    println!("{}", String::from_utf8_lossy(&response.body));
    Ok(())
}
