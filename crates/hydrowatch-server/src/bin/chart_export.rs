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

use anyhow::{Context, Result, anyhow};
use chrono::{NaiveDateTime, Utc};
use chrono_tz::Tz;
use clap::Parser;
use hydrowatch_core::parser::parse_timestamp;
use hydrowatch_core::{FlowUnit, InstallationConfig, RawField, chart_from_rows};
use hydrowatch_server::read_timeline_csv;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "chart-export")]
#[command(about = "Build the chart payload of a timeline CSV file and print it as JSON", long_about = None)]
struct Cli {
    /// Path to the timeline CSV file
    #[arg(short, long)]
    csv: PathBuf,

    /// Flow unit of the installation ("l/s" or "m3/s")
    #[arg(short, long, default_value = "m3/s")]
    flow_unit: FlowUnit,

    /// Reference time for the today/month windows (defaults to the current time)
    #[arg(short, long)]
    now: Option<String>,

    /// IANA timezone of the timeline timestamps
    #[arg(short, long, default_value = "Europe/Rome")]
    timezone: String,

    /// CSV field delimiter
    #[arg(short, long, default_value_t = ',')]
    delimiter: char,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

fn resolve_now(now: Option<&str>, timezone: Tz) -> Result<NaiveDateTime> {
    match now {
        Some(text) => parse_timestamp(&RawField::from(text), timezone)
            .map_err(|e| anyhow!("Invalid --now: {e}")),
        None => Ok(Utc::now().with_timezone(&timezone).naive_local()),
    }
}

fn delimiter_byte(delimiter: char) -> Result<u8> {
    u8::try_from(delimiter)
        .ok()
        .filter(u8::is_ascii)
        .context("Delimiter must be a single ASCII character")
}

fn main() -> Result<()> {
    hydrowatch_server::init_tracing();
    let cli = Cli::parse();

    let timezone: Tz = cli
        .timezone
        .parse()
        .map_err(|_| anyhow!("Unknown timezone: {}", cli.timezone))?;
    let delimiter = delimiter_byte(cli.delimiter)?;
    let now = resolve_now(cli.now.as_deref(), timezone)?;

    let nickname = cli
        .csv
        .file_stem()
        .map_or_else(|| "timeline".to_owned(), |s| s.to_string_lossy().into_owned());
    let config = InstallationConfig {
        name: nickname.clone(),
        nickname,
        flow_unit: cli.flow_unit,
    };

    info!("Reading timeline file: {}", cli.csv.display());
    let rows = read_timeline_csv(&cli.csv, delimiter, &config.nickname)?;
    info!("Read {} rows", rows.len());

    let data = chart_from_rows(&rows, &config, now, timezone)?;
    let json = if cli.pretty {
        serde_json::to_string_pretty(&data)?
    } else {
        serde_json::to_string(&data)?
    };
    println!("{json}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Europe::Rome;

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_resolve_now_parses_given_time() {
        assert_eq!(
            resolve_now(Some("2024-01-01 23:00"), Rome).unwrap(),
            dt("2024-01-01 23:00:00")
        );
        assert_eq!(
            resolve_now(Some("2024-01-01T22:00:00Z"), Rome).unwrap(),
            dt("2024-01-01 23:00:00")
        );
    }

    #[test]
    fn test_resolve_now_rejects_garbage() {
        let err = resolve_now(Some("tomorrow"), Rome).unwrap_err();
        assert!(err.to_string().contains("Invalid --now"));
    }

    #[test]
    fn test_resolve_now_defaults_to_current_local_time() {
        let before = Utc::now().with_timezone(&Rome).naive_local();
        let now = resolve_now(None, Rome).unwrap();
        let after = Utc::now().with_timezone(&Rome).naive_local();
        assert!(before <= now && now <= after);
    }

    #[test]
    fn test_delimiter_byte() {
        assert_eq!(delimiter_byte(',').unwrap(), b',');
        assert_eq!(delimiter_byte(';').unwrap(), b';');
        assert_eq!(delimiter_byte('\t').unwrap(), b'\t');
        assert!(delimiter_byte('§').is_err());
        assert!(delimiter_byte('€').is_err());
    }
}
