//! chatrelay HTTP server
//!
//! Loads configuration, refuses to start without an upstream API key, and
//! serves the landing page and the `/chat` relay.

use chatrelay::{
    cli::{Cli, Command, generate_config_template},
    config::{Config, EnvOverrides},
    handlers::{self, AppState},
    telemetry,
};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Some(Command::Config { output }) = &cli.command {
        let template = generate_config_template();
        match output {
            Some(path) => {
                std::fs::write(path, template)?;
                println!("Wrote configuration template to {}", path);
            }
            None => print!("{}", template),
        }
        return Ok(());
    }

    // .env must be loaded before the environment is read
    let dotenv_path = dotenvy::dotenv().ok();

    let config_path = cli.config_path();
    let config = Config::load(config_path.as_deref(), &EnvOverrides::from_env())?;

    telemetry::init(&config.observability.log_level);

    if let Some(path) = dotenv_path {
        tracing::debug!(path = %path.display(), "Loaded .env file");
    }
    match &config_path {
        Some(path) => tracing::info!(path = %path.display(), "Loaded configuration file"),
        None => tracing::info!("No configuration file, using defaults"),
    }
    tracing::info!(
        base_url = %config.upstream.base_url(),
        model = %config.upstream.model(),
        timeout_seconds = config.upstream.timeout_seconds(),
        template_dir = %config.assets.template_dir.display(),
        static_dir = %config.assets.static_dir.display(),
        "Upstream configured"
    );

    let ip = config
        .server
        .host
        .parse::<std::net::IpAddr>()
        .unwrap_or_else(|_| {
            tracing::warn!(host = %config.server.host, "Invalid host, binding to 127.0.0.1");
            std::net::IpAddr::from([127, 0, 0, 1])
        });
    let addr = SocketAddr::from((ip, config.server.port));

    let state = AppState::new(Arc::new(config))?;
    let app = handlers::router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
            tracing::info!("Shutting down");
        })
        .await?;

    Ok(())
}
