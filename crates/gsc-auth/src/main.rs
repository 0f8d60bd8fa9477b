mod listener;
mod output;
mod paste;

#[cfg(test)]
mod testing;

use clap::{Parser, Subcommand};
use gsc_core::auth::GoogleProvider;
use gsc_core::config::{ClientCredentials, Endpoints};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "gsc-refresh-token",
    version,
    about = "Obtain a Google OAuth2 refresh token for the Search Console API"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the consent URL and read the authorization code from stdin.
    Paste,
    /// Receive the authorization code on a local callback listener.
    Listen {
        #[arg(long, default_value_t = listener::DEFAULT_PORT)]
        port: u16,
        /// Print the consent URL without opening a browser.
        #[arg(long)]
        no_browser: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let credentials = ClientCredentials::from_env()?;
    let provider = GoogleProvider::new(credentials.clone(), &Endpoints::default())?;

    let refresh_token = match cli.command {
        Command::Paste => paste::run(&provider).await?,
        Command::Listen { port, no_browser } => listener::run(&provider, port, !no_browser).await?,
    };

    print!("{}", output::render_success(&credentials, &refresh_token));
    Ok(())
}
