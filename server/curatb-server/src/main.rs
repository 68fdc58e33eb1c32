use std::path::PathBuf;

use clap::Parser;
use colored::*;
use tracing::info;

use config_engine::Settings;
use curatb_server::{create_app, CuraServer};
use error_common::{CuraError, Result};
use logger_redacted::{init_tracing, LoggerConfig};

/// CuraTB proxy server
#[derive(Parser, Debug)]
#[command(name = "curatb-server")]
#[command(about = "Browser-facing proxy for the tuberculosis cure-time RNA service")]
struct Args {
    /// Settings file (TOML, or YAML by extension)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the bind address, e.g. 127.0.0.1:3000
    #[arg(long)]
    bind: Option<String>,

    /// Override the backend RNA base URL
    #[arg(long)]
    backend_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON log lines
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let logger = LoggerConfig::for_service("curatb-server")
        .verbose(args.verbose)
        .with_environment();
    let logger = if args.json_logs { logger.json(true) } else { logger };
    init_tracing(&logger).map_err(|e| CuraError::Internal(e.to_string()))?;

    let mut settings = Settings::load(args.config.as_deref())
        .map_err(|e| CuraError::Config(e.to_string()))?
        .server;
    if let Some(bind) = args.bind {
        settings.bind_address = bind;
    }
    if let Some(backend_url) = args.backend_url {
        settings.backend_url = backend_url;
    }

    info!("🩺 {}", "Starting CuraTB proxy server".bright_cyan());
    info!("📋 Version: {}", env!("CARGO_PKG_VERSION").bright_white());
    info!("🔗 Backend RNA service: {}", settings.backend_url.bright_yellow());
    info!(
        "💾 Model status store: {:?} ({})",
        settings.status_store,
        settings.status_store_path.display()
    );

    let bind_address = settings.bind_address.clone();
    let server = CuraServer::new(settings)
        .map_err(|e| CuraError::Config(e.to_string()))?
        .with_redactor(logger.redactor());
    let app = create_app(server);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .map_err(|e| CuraError::Network(format!("Failed to bind to {}: {}", bind_address, e)))?;

    info!("🚀 {}", format!("CuraTB server running on http://{}", bind_address).bright_green());
    info!("📋 {}", format!("Health check available at: http://{}/health", bind_address).bright_blue());
    info!("📖 {}", format!("OpenAPI document at: http://{}/api-docs/openapi.json", bind_address).bright_blue());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| CuraError::Server(format!("HTTP server error: {}", e)))?;

    info!("👋 {}", "CuraTB server stopped".bright_white());
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
