use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use extension_explorer_core::Config;
use extension_explorer_mcp::ExplorerServer;
use rmcp::{transport::stdio, ServiceExt};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "extension-explorer-mcp")]
#[command(about = "MCP server for exploring IntelliJ Platform extension points")]
#[command(version)]
struct Cli {
    /// Config file (default: ~/.extension-explorer/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write a commented default config to the config path and exit
    #[arg(long)]
    init_config: bool,

    /// Verbose logging (stderr)
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // stdout carries the protocol
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn resolve_config_path(cli_path: Option<PathBuf>) -> Result<PathBuf> {
    match cli_path {
        Some(path) => Ok(path),
        None => Config::default_path().context("cannot resolve default config path"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_path = resolve_config_path(cli.config)?;

    if cli.init_config {
        let path = Config::init(&config_path)?;
        eprintln!("Config written to {}", path.display());
        return Ok(());
    }

    let config = Config::load(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;

    tracing::info!(
        config = %config_path.display(),
        index_url = %config.registry.index_url,
        "starting extension explorer MCP server"
    );

    let service = ExplorerServer::new(config)
        .serve(stdio())
        .await
        .inspect_err(|e| tracing::error!(error = %e, "failed to start MCP server"))?;

    service.waiting().await?;
    tracing::info!("MCP server stopped");
    Ok(())
}
