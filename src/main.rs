use anyhow::Result;
use clap::Parser;
use nimble_exporter::config::{Config, LogFormat};
use nimble_exporter::{logging, server};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/Default.toml")]
    config: String,

    /// Listen address, e.g. ":9017" or "127.0.0.1:9017" (overrides config)
    #[arg(long)]
    listen: Option<String>,

    /// Nimble management API address (overrides config)
    #[arg(long)]
    nimble: Option<String>,

    /// Auth salt (overrides config)
    #[arg(long, alias = "auth_salt")]
    auth_salt: Option<String>,

    /// Auth hash (overrides config)
    #[arg(long, alias = "auth_hash")]
    auth_hash: Option<String>,

    /// Log level (overrides config)
    #[arg(long)]
    loglevel: Option<String>,

    /// Log format (overrides config)
    #[arg(long, value_enum)]
    logfmt: Option<LogFormat>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Load configuration
    let mut config = Config::load(&args.config)?;

    // Override with CLI arguments if provided
    if let Some(listen) = args.listen {
        config.server.listen = listen;
    }
    if let Some(address) = args.nimble {
        config.nimble.address = address;
    }
    if let Some(salt) = args.auth_salt {
        config.nimble.auth_salt = salt;
    }
    if let Some(hash) = args.auth_hash {
        config.nimble.auth_hash = secrecy::SecretString::new(hash.into());
    }
    if let Some(level) = args.loglevel {
        config.log.level = level;
    }
    if let Some(format) = args.logfmt {
        config.log.format = format;
    }
    config.validate()?;

    // Initialize tracing
    logging::init(&config.log)?;

    info!(
        "Starting Nimble Prometheus Exporter v{}",
        env!("CARGO_PKG_VERSION")
    );
    info!("Nimble address: {}", config.nimble.address);
    info!(
        "Metrics endpoint: http://{}/",
        config.server.bind_addr()
    );

    // Start the metrics server
    if let Err(e) = server::start(config).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
