//! Gateway binary: load config, register backends, listen until ctrl-c.

use std::path::PathBuf;

use clap::Parser;

use api_gateway::config::{load_config, ConfigError, GatewayConfig};
use api_gateway::observability::logging;
use api_gateway::Gateway;

#[derive(Parser, Debug)]
#[command(name = "api-gateway", about = "HTTP(S) API gateway", version)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "gateway.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match load_config(&args.config) {
        Ok(config) => config,
        Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            // A missing file means defaults; a broken file is fatal.
            GatewayConfig::default()
        }
        Err(e) => return Err(e.into()),
    };

    logging::init(&config.observability.log_level);

    tracing::info!(
        config = %args.config.display(),
        http = config.gateway.http,
        https = config.gateway.https,
        port = config.gateway.port,
        backends = config.backends.len(),
        "configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => api_gateway::observability::metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "failed to parse metrics address"
            ),
        }
    }

    let gateway = Gateway::new(config.options());

    for backend in &config.backends {
        let credentials = backend.credentials.clone().map(Into::into);
        gateway
            .register_backend_with(&backend.uri, credentials)
            .await?;
        tracing::info!(uri = %backend.uri, "backend registered");
    }

    let handle = gateway
        .listen(|| tracing::info!("all listeners ready"))
        .await?;

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown signal received");

    handle.shutdown();
    handle.wait().await;

    tracing::info!("shutdown complete");
    Ok(())
}
