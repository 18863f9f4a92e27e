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

use crate::sample::{Sample, SampleSeries, Signal};
use crate::window::ChartWindows;

/// Maximum of the defined values of `signal`, skipping missing ones.
///
/// `None` when the subset is empty or holds no defined value.
#[must_use]
pub fn max_of(samples: &[Sample], signal: Signal) -> Option<f64> {
    samples
        .iter()
        .filter_map(|s| signal.value(s))
        .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |m| m.max(v))))
}

/// Power maxima for the three chart windows
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PowerMaxima {
    pub today: Option<f64>,
    pub month: Option<f64>,
    pub year: Option<f64>,
}

impl PowerMaxima {
    /// Computed on raw power; power never gets a unit conversion
    #[must_use]
    pub fn compute(series: &SampleSeries, windows: &ChartWindows) -> Self {
        Self {
            today: max_of(windows.today.select(series), Signal::Power),
            month: max_of(windows.this_month.select(series), Signal::Power),
            year: max_of(windows.full_series.select(series), Signal::Power),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample(power: Option<f64>) -> Sample {
        Sample {
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            power,
            efficiency: None,
            flow: None,
            pressure: None,
        }
    }

    #[test]
    fn test_max_of_empty_is_none() {
        assert_eq!(max_of(&[], Signal::Power), None);
    }

    #[test]
    fn test_max_of_all_missing_is_none() {
        let samples = [sample(None), sample(None)];
        assert_eq!(max_of(&samples, Signal::Power), None);
    }

    #[test]
    fn test_max_of_skips_missing() {
        let samples = [sample(Some(3.0)), sample(None), sample(Some(7.5)), sample(Some(-2.0))];
        assert_eq!(max_of(&samples, Signal::Power), Some(7.5));
    }

    #[test]
    fn test_max_of_negative_only() {
        let samples = [sample(Some(-4.0)), sample(None), sample(Some(-1.0))];
        assert_eq!(max_of(&samples, Signal::Power), Some(-1.0));
    }

    #[test]
    fn test_max_of_other_signal() {
        let mut s = sample(Some(100.0));
        s.pressure = Some(2.5);
        assert_eq!(max_of(&[s], Signal::Pressure), Some(2.5));
        assert_eq!(max_of(&[sample(Some(1.0))], Signal::Flow), None);
    }
}
