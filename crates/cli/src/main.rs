use clap::Parser;
use ferrous_named_domain::CliOverrides;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

mod bootstrap;
mod di;
mod server;

#[derive(Parser)]
#[command(name = "ferrous-named")]
#[command(version = "0.1.0")]
#[command(about = "Ferrous Named - authoritative DNS for a local zone with upstream referral")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// DNS server port
    #[arg(short = 'd', long)]
    dns_port: Option<u16>,

    /// Bind address
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// Hosts file the local zone is loaded from
    #[arg(long, value_name = "FILE")]
    hosts: Option<String>,

    /// Interface whose address selects the upstream server group
    #[arg(long, value_name = "NAME")]
    interface: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        dns_port: cli.dns_port,
        bind_address: cli.bind.clone(),
        hosts_path: cli.hosts.clone(),
        referral_interface: cli.interface.clone(),
        log_level: cli.log_level.clone(),
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config);

    info!("Starting Ferrous Named v{}", env!("CARGO_PKG_VERSION"));

    let runtime = Arc::new(bootstrap::build_configuration(&config).await?);
    let records = bootstrap::load_records(&config, &runtime).await?;

    let services = di::DnsServices::new(&config, runtime.clone(), records);

    let shutdown = CancellationToken::new();
    tokio::spawn(wait_for_shutdown(shutdown.clone()));

    let bind_addr = format!("{}:{}", config.server.bind_address, runtime.port);
    server::start_dns_server(&bind_addr, services.dispatcher, shutdown).await?;

    info!("Server shutdown complete");
    Ok(())
}

async fn wait_for_shutdown(shutdown: CancellationToken) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate = match signal(SignalKind::terminate()) {
            Ok(terminate) => terminate,
            Err(e) => {
                warn!(error = %e, "Unable to listen for SIGTERM");
                wait_for_ctrl_c().await;
                shutdown.cancel();
                return;
            }
        };

        tokio::select! {
            _ = wait_for_ctrl_c() => {}
            _ = terminate.recv() => info!("Received SIGTERM"),
        }
    }

    #[cfg(not(unix))]
    wait_for_ctrl_c().await;

    info!("Received shutdown signal, stopping DNS server");
    shutdown.cancel();
}

async fn wait_for_ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Unable to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
