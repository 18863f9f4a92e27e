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

//! HydroWatch chart engine
//!
//! Turns a full-year monitoring timeline of one installation into the chart
//! payload served to the web client.
//!
//! ## Stages
//!
//! - **Parser**: raw rows to a time-ordered [`SampleSeries`]
//! - **Windows**: today / this month / full series relative to a given `now`
//! - **Aggregate**: power maxima per window, skipping missing values
//! - **Transform**: efficiency to percent, flow to the installation's unit
//! - **Chart**: [`ChartData`] with `null` for every missing value

pub mod aggregate;
pub mod chart;
pub mod error;
pub mod installation;
pub mod parser;
pub mod pipeline;
pub mod sample;
pub mod transform;
pub mod window;

pub use aggregate::{PowerMaxima, max_of};
pub use chart::{ChartData, TIME_LABEL_FORMAT};
pub use error::{ChartError, Result};
pub use installation::{FlowUnit, InstallationConfig, InstallationDirectory, SampleSource};
pub use parser::parse_rows;
pub use pipeline::{ChartService, chart_from_rows};
pub use sample::{RawField, RawRow, Sample, SampleSeries, Signal};
pub use transform::transform_for_chart;
pub use window::{ChartWindows, Window};
