//! # vgate-api: Binary Entry Point
//!
//! Discovers schemas, then starts the Axum HTTP server.
//! Binds to configurable port (default 8080).

use std::path::PathBuf;

use clap::Parser;

use vgate_api::state::AppConfig;
use vgate_api::telemetry::LogFormat;

/// Request-body validation service.
#[derive(Parser, Debug)]
#[command(name = "vgate-api", version, about)]
struct Args {
    /// YAML configuration file.
    #[arg(long, env = "VGATE_CONFIG")]
    config: Option<PathBuf>,

    /// Port to bind.
    #[arg(long, env = "PORT", default_value_t = 8080)]
    port: u16,

    /// Schema root directory; repeat for several. Replaces `schema_paths`.
    #[arg(long = "schema-path")]
    schema_paths: Vec<PathBuf>,

    /// Log output format.
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    vgate_api::telemetry::init(args.log_format)?;

    let validation = vgate_api::bootstrap::load_config(args.config.as_deref(), args.schema_paths)
        .map_err(|e| {
            tracing::error!("configuration failed: {e}");
            e
        })?;
    let config = AppConfig {
        port: args.port,
        validation,
    };

    let state = vgate_api::bootstrap::bootstrap(config)
        .map_err(|e| {
            tracing::error!("bootstrap failed: {e}");
            e
        })?;

    let app = vgate_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], args.port));
    tracing::info!("vgate API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
