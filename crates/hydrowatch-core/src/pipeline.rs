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

//! Chart request pipeline: lookup, fetch, parse, window, reduce, transform, assemble

use chrono::NaiveDateTime;
use chrono_tz::Tz;
use tracing::{debug, warn};

use crate::aggregate::PowerMaxima;
use crate::chart::ChartData;
use crate::error::Result;
use crate::installation::{InstallationConfig, InstallationDirectory, SampleSource};
use crate::parser::parse_rows;
use crate::sample::RawRow;
use crate::transform::transform_for_chart;
use crate::window::ChartWindows;

/// Serves chart data for installations using the given collaborators.
///
/// Holds no per-request state; every call builds its own series.
#[derive(Debug, Clone)]
pub struct ChartService<D, S> {
    directory: D,
    source: S,
    timezone: Tz,
}

impl<D, S> ChartService<D, S>
where
    D: InstallationDirectory,
    S: SampleSource,
{
    /// `timezone` is the calendar reference of both sample timestamps and `now`
    pub fn new(directory: D, source: S, timezone: Tz) -> Self {
        Self {
            directory,
            source,
            timezone,
        }
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Build the chart payload of `installation` relative to local wall-clock `now`.
    ///
    /// Any collaborator failure fails the whole request; no partial payload is produced.
    pub fn chart_data(&self, installation: &str, now: NaiveDateTime) -> Result<ChartData> {
        let config = self.directory.lookup(installation)?;
        debug!(
            installation = %installation,
            name = %config.name,
            flow_unit = %config.flow_unit,
            "Installation resolved"
        );

        let rows = self.source.fetch_raw_rows(installation)?;
        debug!(installation = %installation, rows = rows.len(), "Timeline rows read");

        chart_from_rows(&rows, &config, now, self.timezone)
    }
}

/// Run the pure part of the pipeline over already fetched rows
pub fn chart_from_rows(
    rows: &[RawRow],
    config: &InstallationConfig,
    now: NaiveDateTime,
    timezone: Tz,
) -> Result<ChartData> {
    let series = parse_rows(rows, &config.nickname, timezone)?;

    let windows = ChartWindows::at(now);
    let maxima = PowerMaxima::compute(&series, &windows);
    debug!(
        installation = %config.nickname,
        today_start = ?windows.today.start,
        month_start = ?windows.this_month.start,
        today_samples = windows.today.range_in(&series).len(),
        month_samples = windows.this_month.range_in(&series).len(),
        today_max = ?maxima.today,
        month_max = ?maxima.month,
        year_max = ?maxima.year,
        "Power maxima computed"
    );

    let transformed = transform_for_chart(&series, config);
    let data = ChartData::assemble(&transformed, maxima);
    if data.is_empty() {
        warn!(
            installation = %config.nickname,
            "Timeline has no samples, serving an empty chart"
        );
    }
    debug!(installation = %config.nickname, records = data.len(), "Chart data ready");

    Ok(data)
}
