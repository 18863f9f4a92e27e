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

//! Per-signal unit conversion applied before charting

use tracing::{debug, warn};

use crate::installation::{FlowUnit, InstallationConfig};
use crate::sample::{SampleSeries, Signal};

/// Efficiency fraction to percentage
pub const EFFICIENCY_PERCENT_SCALE: f64 = 100.0;

/// Chart view of `series`: efficiency as percentage, flow in the installation's unit.
///
/// Returns a new series; `series` itself is never modified. A value that
/// overflows when scaled is dropped and logged.
#[must_use]
pub fn transform_for_chart(series: &SampleSeries, config: &InstallationConfig) -> SampleSeries {
    let transformed = scale_signal(
        series,
        Signal::Efficiency,
        EFFICIENCY_PERCENT_SCALE,
        &config.nickname,
    );

    if config.flow_unit == FlowUnit::CubicMetersPerSecond {
        return transformed;
    }

    debug!(
        installation = %config.nickname,
        unit = %config.flow_unit,
        "Converting flow from m3/s"
    );
    scale_signal(
        &transformed,
        Signal::Flow,
        config.flow_unit.scale(),
        &config.nickname,
    )
}

fn scale_signal(
    series: &SampleSeries,
    signal: Signal,
    factor: f64,
    installation: &str,
) -> SampleSeries {
    let scaled = series.map_signal(signal, |v| Some(v * factor).filter(|x| x.is_finite()));

    let dropped = series
        .iter()
        .zip(&scaled)
        .filter(|(before, after)| {
            signal.value(before).is_some() && signal.value(after).is_none()
        })
        .count();
    if dropped > 0 {
        warn!(
            installation = %installation,
            column = signal.column(),
            factor,
            dropped,
            "Scaled values out of range, sent as null"
        );
    }
    scaled
}
