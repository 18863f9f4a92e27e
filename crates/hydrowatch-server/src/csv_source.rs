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

//! Sample source reading full-year timeline CSV files from disk

use hydrowatch_core::{ChartError, RawField, RawRow, SampleSource};
use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::ServerConfig;

/// Reads `<root>/<folder>/<file>` of each configured installation
#[derive(Debug, Clone)]
pub struct CsvSampleSource {
    timelines: HashMap<String, PathBuf>,
    delimiter: u8,
}

impl CsvSampleSource {
    #[must_use]
    pub fn new(timelines: HashMap<String, PathBuf>, delimiter: u8) -> Self {
        Self {
            timelines,
            delimiter,
        }
    }

    pub fn from_config(config: &ServerConfig) -> anyhow::Result<Self> {
        let timelines = config
            .installations
            .iter()
            .map(|inst| {
                (
                    inst.nickname.clone(),
                    inst.timeline_path(&config.data.root),
                )
            })
            .collect();
        Ok(Self::new(timelines, config.data.delimiter_byte()?))
    }
}

impl SampleSource for CsvSampleSource {
    fn fetch_raw_rows(&self, installation: &str) -> hydrowatch_core::Result<Vec<RawRow>> {
        let path = self
            .timelines
            .get(installation)
            .ok_or_else(|| ChartError::unknown_installation(installation))?;
        read_timeline_csv(path, self.delimiter, installation)
    }
}

/// Read a timeline CSV into raw rows keyed by header name.
///
/// Empty cells are left out of the row. A missing or unreadable file is
/// `SourceUnavailable`; a structurally broken file is `MalformedSource`.
pub fn read_timeline_csv(
    path: &Path,
    delimiter: u8,
    installation: &str,
) -> hydrowatch_core::Result<Vec<RawRow>> {
    debug!(installation = %installation, path = %path.display(), "Reading timeline file");

    let file = File::open(path).map_err(|e| {
        ChartError::source_unavailable(installation, format!("{}: {e}", path.display()))
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| csv_error(installation, None, e))?
        .clone();

    reader
        .records()
        .enumerate()
        .map(|(idx, record)| -> hydrowatch_core::Result<RawRow> {
            let record = record.map_err(|e| csv_error(installation, Some(idx + 1), e))?;
            Ok(headers
                .iter()
                .zip(record.iter())
                .filter(|(_, cell)| !cell.is_empty())
                .map(|(name, cell)| (name.to_owned(), RawField::from(cell)))
                .collect())
        })
        .collect()
}

fn csv_error(installation: &str, row: Option<usize>, err: csv::Error) -> ChartError {
    if matches!(err.kind(), csv::ErrorKind::Io(_)) {
        ChartError::source_unavailable(installation, err)
    } else {
        ChartError::malformed(installation, row, err)
    }
}
