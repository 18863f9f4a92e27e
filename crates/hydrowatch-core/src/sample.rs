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

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Column names used by the monitoring timeline export
pub mod columns {
    pub const TIMESTAMP: &str = "t";
    pub const POWER: &str = "P";
    pub const EFFICIENCY: &str = "Eta";
    pub const FLOW: &str = "Q";
    pub const PRESSURE: &str = "Bar";
}

/// One raw cell as delivered by a sample source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawField {
    Number(f64),
    Text(String),
}

impl From<f64> for RawField {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for RawField {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for RawField {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// One raw row: field name to cell. A missing key is an absent field.
pub type RawRow = BTreeMap<String, RawField>;

/// A single monitoring reading.
///
/// Timestamps are wall-clock times in the installation's timezone.
/// `None` means the signal was not recorded for this instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub timestamp: NaiveDateTime,
    /// Instantaneous power, raw units
    pub power: Option<f64>,
    /// Efficiency as a fraction (0-1) until rescaled
    pub efficiency: Option<f64>,
    /// Flow, cubic metres per second as recorded
    pub flow: Option<f64>,
    /// Pressure, raw units
    pub pressure: Option<f64>,
}

/// The four monitored signals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    Power,
    Efficiency,
    Flow,
    Pressure,
}

impl Signal {
    #[must_use]
    pub fn column(self) -> &'static str {
        match self {
            Self::Power => columns::POWER,
            Self::Efficiency => columns::EFFICIENCY,
            Self::Flow => columns::FLOW,
            Self::Pressure => columns::PRESSURE,
        }
    }

    #[must_use]
    pub fn value(self, sample: &Sample) -> Option<f64> {
        match self {
            Self::Power => sample.power,
            Self::Efficiency => sample.efficiency,
            Self::Flow => sample.flow,
            Self::Pressure => sample.pressure,
        }
    }

    pub fn value_mut(self, sample: &mut Sample) -> &mut Option<f64> {
        match self {
            Self::Power => &mut sample.power,
            Self::Efficiency => &mut sample.efficiency,
            Self::Flow => &mut sample.flow,
            Self::Pressure => &mut sample.pressure,
        }
    }
}

/// Samples of one request, sorted by timestamp.
///
/// Only the parser builds a series, so the ordering always holds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleSeries {
    samples: Vec<Sample>,
}

impl SampleSeries {
    /// Build a series, stable-sorting by timestamp. Returns whether a reorder was needed.
    pub(crate) fn from_unsorted(mut samples: Vec<Sample>) -> (Self, bool) {
        let sorted = samples
            .windows(2)
            .all(|pair| pair[0].timestamp <= pair[1].timestamp);
        if !sorted {
            samples.sort_by_key(|s| s.timestamp);
        }
        (Self { samples }, !sorted)
    }

    #[must_use]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    /// Derived copy with `f` applied to every defined value of `signal`.
    ///
    /// `f` may drop a value by returning `None`; missing values stay missing.
    #[must_use]
    pub fn map_signal(&self, signal: Signal, f: impl Fn(f64) -> Option<f64>) -> Self {
        let mut samples = self.samples.clone();
        for sample in &mut samples {
            let slot = signal.value_mut(sample);
            *slot = slot.and_then(&f);
        }
        Self { samples }
    }
}

impl<'a> IntoIterator for &'a SampleSeries {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn sample(hour: u32, power: Option<f64>) -> Sample {
        Sample {
            timestamp: at(hour),
            power,
            efficiency: None,
            flow: None,
            pressure: None,
        }
    }

    #[test]
    fn test_from_unsorted_keeps_sorted_input() {
        let (series, reordered) =
            SampleSeries::from_unsorted(vec![sample(1, Some(1.0)), sample(2, Some(2.0))]);
        assert!(!reordered);
        assert_eq!(series.samples()[0].timestamp, at(1));
    }

    #[test]
    fn test_from_unsorted_is_stable_for_duplicates() {
        let (series, reordered) = SampleSeries::from_unsorted(vec![
            sample(5, Some(1.0)),
            sample(3, Some(2.0)),
            sample(3, Some(3.0)),
        ]);
        assert!(reordered);
        let powers: Vec<_> = series.iter().map(|s| s.power).collect();
        assert_eq!(powers, vec![Some(2.0), Some(3.0), Some(1.0)]);
    }

    #[test]
    fn test_map_signal_leaves_original_untouched() {
        let (series, _) = SampleSeries::from_unsorted(vec![sample(1, Some(2.0)), sample(2, None)]);
        let doubled = series.map_signal(Signal::Power, |v| Some(v * 2.0));

        assert_eq!(doubled.samples()[0].power, Some(4.0));
        assert_eq!(doubled.samples()[1].power, None);
        assert_eq!(series.samples()[0].power, Some(2.0));
    }

    #[test]
    fn test_map_signal_can_drop_values() {
        let (series, _) =
            SampleSeries::from_unsorted(vec![sample(1, Some(2.0)), sample(2, Some(-1.0))]);
        let positive = series.map_signal(Signal::Power, |v| (v > 0.0).then_some(v));

        assert_eq!(positive.samples()[0].power, Some(2.0));
        assert_eq!(positive.samples()[1].power, None);
    }

    #[test]
    fn test_raw_field_untagged_deserialize() {
        let row: RawRow = serde_json::from_str(r#"{"t": "2024-01-01 00:00", "P": 5}"#).unwrap();
        assert_eq!(row["P"], RawField::Number(5.0));
        assert_eq!(row["t"], RawField::Text("2024-01-01 00:00".to_owned()));
    }
}
