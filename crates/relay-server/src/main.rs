//! WebSocket room relay server.

use anyhow::Result;
use clap::Parser;
use relay_server::config::Config;
use relay_server::server;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(name = "relay-server")]
#[clap(about = "Relays text between WebSocket clients in the same room")]
struct Cli {
    /// Interface to bind (overrides RELAY_BIND_ADDR)
    #[clap(long)]
    bind_addr: Option<String>,

    /// Port to listen on (overrides RELAY_PORT)
    #[clap(short, long)]
    port: Option<u16>,

    /// Connection limit (overrides RELAY_MAX_CLIENTS)
    #[clap(long)]
    max_clients: Option<usize>,

    /// Log filter when RUST_LOG is unset (overrides RELAY_LOG)
    #[clap(long)]
    log_level: Option<String>,
}

impl Cli {
    fn apply(self, config: &mut Config) {
        if let Some(bind_addr) = self.bind_addr {
            config.bind_addr = bind_addr;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(max_clients) = self.max_clients {
            config.max_clients = max_clients;
        }
        if let Some(log_level) = self.log_level {
            config.log_level = log_level;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    cli.apply(&mut config);
    config.validate()?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!(
        addr = %config.socket_addr_string(),
        max_clients = config.max_clients,
        "starting relay-server"
    );

    server::run(config).await
}
