use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use workorder_server::seed::Seed;
use workorder_service::MemoryService;

#[derive(Parser)]
#[command(name = "workorder-server", about = "Work order API over an in-memory store")]
struct Cli {
    /// Address to bind
    #[arg(long, env = "WORKORDER_BIND", default_value = "127.0.0.1")]
    bind: String,

    #[arg(long, env = "WORKORDER_PORT", default_value_t = 3720)]
    port: u16,

    /// JSON file with accounts and initial data. Demo data when omitted.
    #[arg(long, env = "WORKORDER_SEED")]
    seed: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let seed = match &cli.seed {
        Some(path) => {
            info!("loading seed from {}", path.display());
            Seed::load(path)?
        }
        None => {
            info!("no seed given, loading demo data");
            Seed::demo()
        }
    };
    info!(
        "{} accounts, {} work orders",
        seed.accounts.len(),
        seed.dataset.works.len()
    );

    let addr = SocketAddr::new(cli.bind.parse()?, cli.port);
    let listener = TcpListener::bind(addr).await?;
    info!("workorder-server listening on http://{addr}");

    let auth = seed.auth_config();
    workorder_server::serve(listener, MemoryService::new(seed.dataset), auth).await
}
