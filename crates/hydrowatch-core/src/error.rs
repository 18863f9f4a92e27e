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

//! Error types for chart data requests

use thiserror::Error;

/// Request-fatal failures. Missing sample values are not errors and never end up here.
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("unknown installation: {installation}")]
    UnknownInstallation { installation: String },

    #[error("sample source unavailable for {installation}: {reason}")]
    SourceUnavailable {
        installation: String,
        reason: String,
    },

    #[error("malformed sample source for {installation}{}: {reason}", row_suffix(.row))]
    MalformedSource {
        installation: String,
        /// 1-based data row, `None` when the failure is not tied to a row
        row: Option<usize>,
        reason: String,
    },
}

#[expect(clippy::ref_option, reason = "called from the thiserror format args")]
fn row_suffix(row: &Option<usize>) -> String {
    row.map(|r| format!(" (row {r})")).unwrap_or_default()
}

impl ChartError {
    pub fn unknown_installation(installation: impl Into<String>) -> Self {
        Self::UnknownInstallation {
            installation: installation.into(),
        }
    }

    pub fn source_unavailable(installation: impl Into<String>, reason: impl ToString) -> Self {
        Self::SourceUnavailable {
            installation: installation.into(),
            reason: reason.to_string(),
        }
    }

    pub fn malformed(
        installation: impl Into<String>,
        row: Option<usize>,
        reason: impl ToString,
    ) -> Self {
        Self::MalformedSource {
            installation: installation.into(),
            row,
            reason: reason.to_string(),
        }
    }

    /// Stable identifier used in API error bodies
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnknownInstallation { .. } => "unknown_installation",
            Self::SourceUnavailable { .. } => "source_unavailable",
            Self::MalformedSource { .. } => "malformed_source",
        }
    }

    #[must_use]
    pub fn installation(&self) -> &str {
        match self {
            Self::UnknownInstallation { installation }
            | Self::SourceUnavailable { installation, .. }
            | Self::MalformedSource { installation, .. } => installation,
        }
    }
}

pub type Result<T> = std::result::Result<T, ChartError>;
