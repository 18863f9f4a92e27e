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

//! HydroWatch server: serves installation chart data over HTTP

pub mod api;
pub mod config;
pub mod csv_source;
pub mod directory;

pub use api::{ApiError, AppState, router};
pub use config::ServerConfig;
pub use csv_source::{CsvSampleSource, read_timeline_csv};
pub use directory::ConfigDirectory;

use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "hydrowatch_server=info,hydrowatch_core=info";

/// Initialize tracing from `RUST_LOG`, falling back to info for HydroWatch crates.
///
/// Logs go to stderr so `chart-export` can keep stdout for the payload.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
