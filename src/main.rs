use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cms_api::database::schema::ensure_schema;
use cms_api::{AppConfig, AppState};

#[derive(Parser)]
#[command(name = "cms-api")]
#[command(about = "Content management API for posts, projects and members")]
#[command(version)]
struct Cli {
    #[arg(long, global = true, help = "Listen port (overrides CMS_API_PORT / PORT)")]
    port: Option<u16>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve,

    #[command(about = "Create the content tables if they do not exist")]
    InitSchema,

    #[command(about = "Connect to the database once and run SELECT 1")]
    CheckDb,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_*, ADMIN_* and friends
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cms_api=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::from_env();
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    tracing::info!("Starting cms-api in {:?} mode", config.environment);

    let state = AppState::new(config);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(state).await,
        Commands::InitSchema => {
            ensure_schema(&state.adapter, state.config.database.schema.as_deref())
                .await
                .context("failed to create content tables")?;
            tracing::info!("Schema ready");
            Ok(())
        }
        Commands::CheckDb => {
            state.adapter.ping().await.context("database check failed")?;
            tracing::info!(
                "Database {} on {}:{} is reachable",
                state.config.database.database,
                state.config.database.host,
                state.config.database.port
            );
            Ok(())
        }
    }
}

async fn serve(state: AppState) -> anyhow::Result<()> {
    if !state.config.security.has_admin_credentials() {
        tracing::warn!("ADMIN_USERNAME / ADMIN_PASSWORD not set; every login attempt will be rejected");
    }

    let bind_addr = format!("{}:{}", state.config.server.host, state.config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("cms-api listening on http://{}", bind_addr);

    axum::serve(listener, cms_api::app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
