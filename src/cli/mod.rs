use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::app::{app, AppState};
use crate::config::{self, AppConfig};
use crate::database::DatabaseManager;

#[derive(Parser)]
#[command(name = "recipe-api")]
#[command(about = "Recipe REST API server")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Listen port (overrides RECIPES_PORT)")]
    pub port: Option<u16>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve,

    #[command(about = "Apply database migrations and exit")]
    Migrate,
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = config::config().clone();
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::Migrate => migrate(config).await,
    }
}

async fn serve(config: AppConfig) -> anyhow::Result<()> {
    let state = AppState::from_config(&config)
        .await
        .context("failed to initialize store")?;
    let router = app(state, &config);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!(
        "Recipe API listening on http://{} ({:?} mode, {:?} store)",
        bind_addr,
        config.environment,
        config.server.store
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn migrate(config: AppConfig) -> anyhow::Result<()> {
    let mut database = config.database.clone();
    database.run_migrations = false;

    let pool = DatabaseManager::connect(&database)
        .await
        .context("failed to connect to database")?;
    DatabaseManager::migrate(&pool).await?;
    pool.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_serve() {
        let cli = Cli::parse_from(["recipe-api"]);
        assert_eq!(cli.command, None);
        assert_eq!(cli.port, None);
    }

    #[test]
    fn parses_migrate_and_port() {
        let cli = Cli::parse_from(["recipe-api", "migrate", "--port", "8080"]);
        assert_eq!(cli.command, Some(Commands::Migrate));
        assert_eq!(cli.port, Some(8080));
    }
}
