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

//! Installation metadata and the collaborators that provide it

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Result;
use crate::sample::RawRow;

/// Unit the installation reports flow in on the chart.
///
/// Parsed the same way from config files and the command line: trimmed,
/// case-insensitive, `m³/s` accepted for `m3/s`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum FlowUnit {
    #[default]
    #[serde(rename = "m3/s")]
    CubicMetersPerSecond,
    #[serde(rename = "l/s")]
    LitersPerSecond,
}

impl FlowUnit {
    /// Factor applied to flow recorded in cubic metres per second
    #[must_use]
    pub fn scale(self) -> f64 {
        match self {
            Self::CubicMetersPerSecond => 1.0,
            Self::LitersPerSecond => 1000.0,
        }
    }

    #[must_use]
    pub fn to_config_value(self) -> &'static str {
        match self {
            Self::CubicMetersPerSecond => "m3/s",
            Self::LitersPerSecond => "l/s",
        }
    }
}

impl fmt::Display for FlowUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_config_value())
    }
}

impl FromStr for FlowUnit {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "m3/s" | "m³/s" => Ok(Self::CubicMetersPerSecond),
            "l/s" => Ok(Self::LitersPerSecond),
            other => Err(format!(
                "unknown flow unit '{other}', expected 'l/s' or 'm3/s'"
            )),
        }
    }
}

impl<'de> Deserialize<'de> for FlowUnit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Per-installation settings consumed by the chart pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallationConfig {
    pub nickname: String,
    pub name: String,
    pub flow_unit: FlowUnit,
}

/// Lookup of installation metadata.
///
/// Fails with `ChartError::UnknownInstallation` when `id` is not known.
pub trait InstallationDirectory: Send + Sync {
    fn lookup(&self, id: &str) -> Result<InstallationConfig>;

    /// All known installations, in a stable order
    fn list(&self) -> Vec<InstallationConfig>;
}

/// Provider of the raw full-year timeline rows of an installation.
///
/// Fails with `ChartError::SourceUnavailable` or `ChartError::MalformedSource`.
pub trait SampleSource: Send + Sync {
    fn fetch_raw_rows(&self, installation: &str) -> Result<Vec<RawRow>>;
}
