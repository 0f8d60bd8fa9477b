mod handlers;
mod initialize;
mod protocol;
mod schema;
mod server;
mod tools;

use clap::Parser;
use gsc_core::config::{Credentials, Endpoints};
use gsc_core::google::SearchConsoleApi;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tools::ToolRegistry;

#[derive(Parser, Debug)]
#[command(name = "gsc-mcp", version, about = "Google Search Console MCP server")]
struct Args {
    #[arg(long, default_value = "stdio")]
    transport: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries the protocol; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let args = Args::parse();
    if args.transport != "stdio" {
        anyhow::bail!("only stdio transport is supported");
    }

    let credentials = Credentials::from_env()?;
    let api = SearchConsoleApi::connect(&credentials, &Endpoints::default())?;
    let registry = ToolRegistry::new(api);

    info!("Google Search Console MCP server started");

    let reader = BufReader::new(tokio::io::stdin());
    server::serve(reader, tokio::io::stdout(), &registry).await
}
