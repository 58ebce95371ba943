use anyhow::Context;
use clap::Parser;

use scf_config::ScfSettings;
use scf_db::service::{BootstrapOptions, CatalogSeed, ScfService};
use scf_server::{AppState, build_router};

mod cli;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("scf-server error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    let mut settings = match &cli.config {
        Some(path) => ScfSettings::load_from_file(path)?,
        None => ScfSettings::load_with_dotenv()?,
    };
    if let Some(db) = cli.db {
        settings.database.path = db;
    }
    if let Some(host) = cli.host {
        settings.server.host = host;
    }
    if let Some(port) = cli.port {
        settings.server.port = port;
    }

    init_tracing(cli.quiet, cli.verbose, &settings.logging.level)?;
    settings.validate()?;
    if settings.database.is_in_memory() {
        tracing::warn!("using an in-memory database; nothing survives a restart");
    }

    let service = ScfService::new_local(
        &settings.database.path,
        BootstrapOptions::from(&settings.bootstrap),
    )
    .await
    .with_context(|| format!("failed to open database at {}", settings.database.path))?;

    if let Some(path) = &cli.catalog {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read catalog {}", path.display()))?;
        let seed: CatalogSeed = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse catalog {}", path.display()))?;
        service.seed_catalog(&seed).await.context("failed to import catalog")?;
        tracing::info!(
            risks = seed.risks.len(),
            threats = seed.threats.len(),
            framework_mappings = seed.framework_mappings.len(),
            "catalog imported"
        );
    }

    if let Some(name) = &cli.seed_org {
        let org = service.create_organization(name).await?;
        tracing::info!(organization_id = %org.object_id, name = %org.name, "organization created");
    }

    let addr = settings.server.bind_addr()?;
    let app = build_router(AppState::new(service), &settings.server.normalized_prefix());
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, db = %settings.database.path, "scf-server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(%error, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}

fn init_tracing(quiet: bool, verbose: bool, configured: &str) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        configured
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("SCF_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
