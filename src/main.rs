// src/main.rs

//! Transmog set catalog backend CLI.
//!
//! `serve` runs the HTTP API with background hydration; `hydrate` performs a
//! single hydration pass and exits; `validate` checks the configuration and
//! credentials without touching the network.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use transmogs::api::icons::IconCache;
use transmogs::api::{AppState, router};
use transmogs::error::Result;
use transmogs::models::Config;
use transmogs::pipeline::{Hydrator, RunOutcome};
use transmogs::services::{BlizzardClient, Credentials, SetProvider, WowheadClient};
use transmogs::storage::SetStore;

#[derive(Parser, Debug)]
#[command(
    name = "transmogs",
    version,
    about = "Transmog set catalog backend"
)]
struct Cli {
    #[arg(short, long, default_value = "data/config.toml")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API with background hydration
    Serve,
    /// Run one hydration pass and exit
    Hydrate,
    /// Validate configuration and credentials
    Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = Config::load_or_default(&cli.config);
    config.apply_env();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(&config.logging.level),
    )
    .init();

    config.validate()?;

    match cli.command {
        Command::Serve => serve(config).await,
        Command::Hydrate => hydrate_once(config).await,
        Command::Validate => validate(config),
    }
}

async fn build_state(config: &Config) -> AppState {
    let credentials = Credentials::from_env();
    if credentials.is_none() {
        log::warn!("Blizzard credentials not configured; hydration will fail until they are set");
    }

    let blizzard = Arc::new(BlizzardClient::new(config.blizzard.clone(), credentials));
    let store = Arc::new(SetStore::load(&config.paths.data_file).await);
    let hydrator = Arc::new(Hydrator::new(
        Arc::clone(&blizzard) as Arc<dyn SetProvider>,
        Arc::clone(&store),
        config.hydration.clone(),
    ));

    AppState {
        store,
        blizzard,
        wowhead: Arc::new(WowheadClient::new()),
        hydrator,
        icons: Arc::new(IconCache::new()),
    }
}

async fn serve(config: Config) -> Result<()> {
    let state = build_state(&config).await;

    if config.hydration.run_on_start {
        let hydrator = Arc::clone(&state.hydrator);
        tokio::spawn(async move {
            if let Err(e) = hydrator.run().await {
                log::error!("Startup hydration failed: {}", e);
            }
        });
    }

    if let Some(mins) = config.hydration.interval_mins {
        let hydrator = Arc::clone(&state.hydrator);
        let period = std::time::Duration::from_secs(mins * 60);
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(period).await;
                if let Err(e) = hydrator.run().await {
                    log::error!("Scheduled hydration failed: {}", e);
                }
            }
        });
    }

    let app = router(state, config.server.frontend_url.as_deref());
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("Shut down cleanly");
    Ok(())
}

async fn hydrate_once(config: Config) -> Result<()> {
    let state = build_state(&config).await;

    match state.hydrator.run().await? {
        RunOutcome::Completed(report) => {
            log::info!(
                "Done: {} succeeded, {} failed of {} examined",
                report.succeeded,
                report.failed.len(),
                report.examined
            );
        }
        RunOutcome::AlreadyRunning => unreachable!("single-shot run cannot collide"),
    }
    Ok(())
}

fn validate(config: Config) -> Result<()> {
    config.validate()?;
    match Credentials::from_env() {
        Some(_) => log::info!("Blizzard credentials present"),
        None => log::warn!("BLIZZARD_CLIENT_ID / BLIZZARD_CLIENT_SECRET not set"),
    }
    log::info!(
        "Configuration OK: region={}, port={}, data_file={}",
        config.blizzard.region,
        config.server.port,
        config.paths.data_file
    );
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => log::info!("Received Ctrl+C, shutting down"),
        _ = terminate => log::info!("Received SIGTERM, shutting down"),
    }
}
