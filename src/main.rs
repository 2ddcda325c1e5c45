use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use stats_gateway::config::{read_config, validate_config, GatewayConfig};
use stats_gateway::lifecycle::{signals, startup};
use stats_gateway::observability::logging;
use stats_gateway::provider::Provider;
use stats_gateway::Shutdown;

#[derive(Parser)]
#[command(name = "stats-gateway", version)]
#[command(about = "Routes legacy stats requests to the player's provider", long_about = None)]
struct Cli {
    /// Path to the YAML config file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Listen address, overrides `listener.bind_address`
    #[arg(short, long)]
    address: Option<String>,

    /// Default provider, overrides `provider`
    #[arg(short, long)]
    provider: Option<Provider>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// Colorize log output
    #[arg(long)]
    colorize_logs: bool,
}

impl Cli {
    fn apply(&self, config: &mut GatewayConfig) {
        if let Some(address) = &self.address {
            config.listener.bind_address = address.clone();
        }
        if let Some(provider) = self.provider {
            config.provider = provider;
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match read_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("failed to load {}: {}", cli.config.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let level = if cli.debug {
        "debug".to_string()
    } else {
        config.observability.log_level.clone()
    };
    logging::init(&level, cli.colorize_logs);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "stats-gateway starting");

    cli.apply(&mut config);
    if let Err(errors) = validate_config(&config) {
        for e in errors {
            tracing::error!(error = %e, "Invalid configuration");
        }
        return ExitCode::FAILURE;
    }

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());

    if let Err(e) = startup::run(config, &shutdown).await {
        tracing::error!(error = %e, "Gateway failed");
        return ExitCode::FAILURE;
    }

    tracing::info!("Shutdown complete");
    ExitCode::SUCCESS
}
