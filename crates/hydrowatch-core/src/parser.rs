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

//! Raw rows to a typed, time-ordered sample series

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use chrono_tz::Tz;
use tracing::warn;

use crate::error::{ChartError, Result};
use crate::sample::{RawField, RawRow, Sample, SampleSeries, Signal, columns};

/// Naive layouts accepted for the timestamp column, tried in order
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parse raw rows into a sample series.
///
/// Timestamps are normalised to wall-clock time in `timezone`. Any row with a
/// missing or unreadable timestamp fails the whole batch.
pub fn parse_rows(rows: &[RawRow], installation: &str, timezone: Tz) -> Result<SampleSeries> {
    let samples = rows
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            parse_row(row, timezone)
                .map_err(|reason| ChartError::malformed(installation, Some(idx + 1), reason))
        })
        .collect::<Result<Vec<_>>>()?;

    let (series, reordered) = SampleSeries::from_unsorted(samples);
    if reordered {
        warn!(
            installation = %installation,
            rows = series.len(),
            "Timeline rows were out of order, sorted by timestamp"
        );
    }
    Ok(series)
}

fn parse_row(row: &RawRow, timezone: Tz) -> std::result::Result<Sample, String> {
    let raw_ts = row
        .get(columns::TIMESTAMP)
        .ok_or_else(|| format!("missing '{}' column", columns::TIMESTAMP))?;
    let timestamp = parse_timestamp(raw_ts, timezone)?;

    let value = |signal: Signal| row.get(signal.column()).and_then(parse_number);

    Ok(Sample {
        timestamp,
        power: value(Signal::Power),
        efficiency: value(Signal::Efficiency),
        flow: value(Signal::Flow),
        pressure: value(Signal::Pressure),
    })
}

/// Parse a timestamp cell into local wall-clock time of `timezone`.
///
/// Numbers, and text made only of digits, are Unix seconds. Text with an
/// offset is converted into the zone, naive text is taken as already local.
pub fn parse_timestamp(
    field: &RawField,
    timezone: Tz,
) -> std::result::Result<NaiveDateTime, String> {
    match field {
        RawField::Number(secs) => local_from_unix_seconds(*secs, timezone),
        RawField::Text(text) => parse_timestamp_text(text.trim(), timezone),
    }
}

fn local_from_unix_seconds(secs: f64, timezone: Tz) -> std::result::Result<NaiveDateTime, String> {
    from_unix_seconds(secs)
        .map(|utc| utc.with_timezone(&timezone).naive_local())
        .ok_or_else(|| format!("timestamp {secs} is out of range"))
}

/// `1704067200` or `1704067200.5`, as written by loggers exporting epoch time
fn is_unix_seconds_text(text: &str) -> bool {
    let (whole, fraction) = text.split_once('.').unwrap_or((text, "0"));
    !whole.is_empty()
        && !fraction.is_empty()
        && whole.bytes().all(|b| b.is_ascii_digit())
        && fraction.bytes().all(|b| b.is_ascii_digit())
}

fn parse_timestamp_text(text: &str, timezone: Tz) -> std::result::Result<NaiveDateTime, String> {
    if text.is_empty() {
        return Err("empty timestamp".to_owned());
    }

    if is_unix_seconds_text(text) {
        let secs: f64 = text
            .parse()
            .map_err(|_| format!("unrecognised timestamp '{text}'"))?;
        return local_from_unix_seconds(secs, timezone);
    }

    if let Ok(with_offset) = DateTime::parse_from_rfc3339(text) {
        return Ok(with_offset.with_timezone(&timezone).naive_local());
    }

    if let Some(parsed) = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
    {
        return Ok(parsed);
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| format!("unrecognised timestamp '{text}'"))
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "range is checked before the cast"
)]
fn from_unix_seconds(secs: f64) -> Option<DateTime<chrono::Utc>> {
    if !secs.is_finite() || secs.abs() > 1e15 {
        return None;
    }
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1e9).round() as i64;
    DateTime::from_timestamp(whole as i64, 0)
        .map(|dt| dt + chrono::Duration::nanoseconds(nanos))
}

/// Parse one numeric cell. Absent, empty, non-numeric and non-finite values
/// are all `None`.
#[must_use]
pub fn parse_number(field: &RawField) -> Option<f64> {
    let value = match field {
        RawField::Number(n) => *n,
        RawField::Text(text) => {
            let text = text.trim();
            if text.is_empty() {
                return None;
            }
            match text.parse::<f64>() {
                Ok(n) => n,
                // decimal comma from spreadsheet exports
                Err(_) if !text.contains('.') => text.replacen(',', ".", 1).parse().ok()?,
                Err(_) => return None,
            }
        }
    };
    value.is_finite().then_some(value)
}
