// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of HydroWatch.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

use anyhow::{Context, Result};
use clap::Parser;
use hydrowatch_core::ChartService;
use hydrowatch_server::{AppState, ConfigDirectory, CsvSampleSource, ServerConfig, router};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "hydrowatch-server")]
#[command(about = "Serve installation monitoring chart data over HTTP", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "hydrowatch.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    hydrowatch_server::init_tracing();

    let cli = Cli::parse();
    let config = ServerConfig::from_file(&cli.config)?;
    let timezone = config.data.timezone()?;
    info!(
        installations = config.installations.len(),
        data_root = %config.data.root.display(),
        timezone = %timezone,
        "Loaded config from {}",
        cli.config.display()
    );

    let service = ChartService::new(
        ConfigDirectory::new(&config.installations),
        CsvSampleSource::from_config(&config)?,
        timezone,
    );
    let app = router(AppState::new(service, config.server.source_timeout()));

    let addr = config.server.listen_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Starting HydroWatch server on {addr}");

    axum::serve(listener, app).await?;
    Ok(())
}
