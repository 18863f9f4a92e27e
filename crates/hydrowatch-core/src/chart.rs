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

use crate::aggregate::PowerMaxima;
use crate::sample::{SampleSeries, Signal};

/// Label format expected by the chart client. Seconds are dropped.
pub const TIME_LABEL_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Chart data JSON response.
///
/// Field order matches the client contract; `None` serializes as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub time: Vec<String>,
    /// Power, raw units
    pub pot: Vec<Option<f64>>,
    /// Efficiency, percent
    pub eta: Vec<Option<f64>>,
    /// Flow in the installation's unit
    pub port: Vec<Option<f64>>,
    /// Pressure, raw units
    pub pres: Vec<Option<f64>>,
    pub today_max: Option<f64>,
    pub month_max: Option<f64>,
    pub year_max: Option<f64>,
}

impl ChartData {
    /// Assemble the payload from the chart-transformed series and raw power maxima
    #[must_use]
    pub fn assemble(transformed: &SampleSeries, maxima: PowerMaxima) -> Self {
        let column = |signal: Signal| -> Vec<Option<f64>> {
            transformed.iter().map(|s| signal.value(s)).collect()
        };

        Self {
            time: transformed.iter().map(|s| time_label(s.timestamp)).collect(),
            pot: column(Signal::Power),
            eta: column(Signal::Efficiency),
            port: column(Signal::Flow),
            pres: column(Signal::Pressure),
            today_max: maxima.today,
            month_max: maxima.month,
            year_max: maxima.year,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.time.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

#[must_use]
pub fn time_label(timestamp: NaiveDateTime) -> String {
    timestamp.format(TIME_LABEL_FORMAT).to_string()
}
