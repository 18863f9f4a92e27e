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

//! Calendar windows over a sample series

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use std::ops::Range;

use crate::sample::{Sample, SampleSeries};

/// Open-ended time window `[start, +inf)`; `start == None` covers everything
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: Option<NaiveDateTime>,
}

impl Window {
    #[must_use]
    pub fn starting_at(start: NaiveDateTime) -> Self {
        Self { start: Some(start) }
    }

    #[must_use]
    pub fn unbounded() -> Self {
        Self { start: None }
    }

    /// Index range of samples inside the window.
    ///
    /// Series are sorted, so selection by timestamp value is a suffix.
    #[must_use]
    pub fn range_in(&self, series: &SampleSeries) -> Range<usize> {
        let first = match self.start {
            Some(start) => series.samples().partition_point(|s| s.timestamp < start),
            None => 0,
        };
        first..series.len()
    }

    #[must_use]
    pub fn select<'a>(&self, series: &'a SampleSeries) -> &'a [Sample] {
        &series.samples()[self.range_in(series)]
    }
}

/// The three windows of a chart request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartWindows {
    pub today: Window,
    pub this_month: Window,
    pub full_series: Window,
}

impl ChartWindows {
    /// Windows relative to `now`, which must be in the same calendar reference as the samples
    #[must_use]
    pub fn at(now: NaiveDateTime) -> Self {
        Self {
            today: Window::starting_at(start_of_day(now)),
            this_month: Window::starting_at(start_of_month(now)),
            full_series: Window::unbounded(),
        }
    }
}

#[must_use]
pub fn start_of_day(now: NaiveDateTime) -> NaiveDateTime {
    now.date().and_time(NaiveTime::MIN)
}

#[must_use]
pub fn start_of_month(now: NaiveDateTime) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(now.year(), now.month(), 1)
        .unwrap_or_else(|| now.date())
        .and_time(NaiveTime::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_rows;
    use crate::sample::{RawField, RawRow};
    use chrono_tz::UTC;

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    fn series(stamps: &[&str]) -> SampleSeries {
        let rows: Vec<RawRow> = stamps
            .iter()
            .map(|t| RawRow::from([("t".to_owned(), RawField::from(*t))]))
            .collect();
        parse_rows(&rows, "test", UTC).unwrap()
    }

    #[test]
    fn test_boundaries() {
        let now = dt("2024-03-15 17:42");
        let windows = ChartWindows::at(now);
        assert_eq!(windows.today.start, Some(dt("2024-03-15 00:00")));
        assert_eq!(windows.this_month.start, Some(dt("2024-03-01 00:00")));
        assert_eq!(windows.full_series.start, None);
    }

    #[test]
    fn test_boundaries_at_midnight_of_first_day() {
        let now = dt("2024-02-01 00:00");
        let windows = ChartWindows::at(now);
        assert_eq!(windows.today.start, Some(now));
        assert_eq!(windows.this_month.start, Some(now));
    }

    #[test]
    fn test_ranges() {
        let s = series(&[
            "2024-02-28 10:00",
            "2024-03-01 00:00",
            "2024-03-14 23:59",
            "2024-03-15 00:00",
            "2024-03-15 09:00",
        ]);
        let windows = ChartWindows::at(dt("2024-03-15 17:42"));
        assert_eq!(windows.today.range_in(&s), 3..5);
        assert_eq!(windows.this_month.range_in(&s), 1..5);
        assert_eq!(windows.full_series.range_in(&s), 0..5);
    }

    #[test]
    fn test_empty_window_is_not_an_error() {
        let s = series(&["2023-12-31 10:00"]);
        let windows = ChartWindows::at(dt("2024-01-01 08:00"));
        assert!(windows.today.select(&s).is_empty());
        assert!(windows.this_month.select(&s).is_empty());
        assert_eq!(windows.full_series.select(&s).len(), 1);

        let empty = series(&[]);
        assert_eq!(windows.today.range_in(&empty), 0..0);
    }

    #[test]
    fn test_selection_by_value_for_unsorted_input() {
        let s = series(&["2024-03-15 09:00", "2024-03-01 12:00", "2024-03-15 01:00"]);
        let today = ChartWindows::at(dt("2024-03-15 17:42")).today;
        let selected = today.select(&s);
        assert_eq!(selected.len(), 2);
        assert!(
            selected
                .iter()
                .all(|sample| sample.timestamp >= dt("2024-03-15 00:00"))
        );
    }
}
