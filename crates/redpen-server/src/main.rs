use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use redpen_server::{AppState, RedpenServer, ServerConfig};

/// The redpen paper lifecycle server.
#[derive(Debug, Parser)]
#[command(name = "redpend", version)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the configured bind address.
    #[arg(long)]
    listen: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => ServerConfig::from_path(path)?,
        None => ServerConfig::default(),
    };
    if let Some(listen) = args.listen {
        config.bind_addr = listen;
    }

    let server = RedpenServer::new(config, AppState::in_memory());
    server.serve().await?;
    Ok(())
}
