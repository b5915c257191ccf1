//! Pylon Knowledge Base MCP Server - Entry Point
//!
//! Provides both stdio (default) and HTTP transports.

use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use pylon_kb_mcp::config::{Config, api};
use pylon_kb_mcp::{KnowledgeBase, server::McpServer};

#[derive(Parser, Debug)]
#[command(name = "pylon-kb-mcp")]
#[command(about = "MCP server for the Amplemarket knowledge base on Pylon")]
#[command(version)]
struct Cli {
    /// Pylon API bearer token (required)
    #[arg(long, env = "PYLON_API_TOKEN", hide_env_values = true)]
    api_token: Option<String>,

    /// Pylon API base URL
    #[arg(long, env = "PYLON_API_URL", default_value = api::BASE_URL)]
    api_url: String,

    /// Knowledge base to serve
    #[arg(long, env = "PYLON_KNOWLEDGE_BASE_ID", default_value = api::KNOWLEDGE_BASE_ID)]
    knowledge_base_id: String,

    /// Upstream request timeout in seconds (0 waits indefinitely)
    #[arg(long, default_value_t = api::REQUEST_TIMEOUT.as_secs())]
    request_timeout_secs: u64,

    /// Response cache TTL in seconds (0 disables caching)
    #[arg(long, default_value_t = api::CACHE_TTL.as_secs())]
    cache_ttl_secs: u64,

    /// Transport mode: stdio or http
    #[arg(long, default_value = "stdio")]
    transport: Transport,

    /// HTTP server port (only used with --transport http)
    #[arg(long, default_value = "8000", env = "PORT")]
    port: u16,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum Transport {
    /// Standard input/output
    #[default]
    Stdio,
    /// JSON-RPC over HTTP POST
    Http,
}

/// Logs go to stderr; stdout carries the stdio transport.
fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber.with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)).init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let timeout = match cli.request_timeout_secs {
        0 => None,
        secs => Some(Duration::from_secs(secs)),
    };

    let config = Config::new(cli.api_token.clone().unwrap_or_default())?
        .with_api_base_url(&cli.api_url)?
        .with_knowledge_base_id(cli.knowledge_base_id.clone())
        .with_cache_ttl(Duration::from_secs(cli.cache_ttl_secs))
        .with_request_timeout(timeout);

    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        transport = ?cli.transport,
        "Starting Pylon knowledge base MCP server"
    );

    let config = build_config(&cli).inspect_err(|e| {
        tracing::error!(error = %e, "Failed to initialize Pylon client");
    })?;
    tracing::debug!(?config, "Loaded configuration");

    let kb = KnowledgeBase::new(&config)?;
    let server = McpServer::new(kb);

    match cli.transport {
        Transport::Stdio => {
            tracing::info!("Running in stdio mode");
            server.run_stdio().await?;
        }
        Transport::Http => {
            tracing::info!(port = cli.port, "Running in HTTP mode");
            server.run_http(cli.port).await?;
        }
    }

    Ok(())
}
