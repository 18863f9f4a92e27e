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

use hydrowatch_core::{ChartError, InstallationConfig, InstallationDirectory};

use crate::config::InstallationSettings;

/// Installation directory backed by the `[[installations]]` config table
#[derive(Debug, Clone)]
pub struct ConfigDirectory {
    installations: Vec<InstallationConfig>,
}

impl ConfigDirectory {
    #[must_use]
    pub fn new(settings: &[InstallationSettings]) -> Self {
        Self {
            installations: settings
                .iter()
                .map(InstallationSettings::to_installation_config)
                .collect(),
        }
    }
}

impl InstallationDirectory for ConfigDirectory {
    fn lookup(&self, id: &str) -> hydrowatch_core::Result<InstallationConfig> {
        self.installations
            .iter()
            .find(|inst| inst.nickname == id)
            .cloned()
            .ok_or_else(|| ChartError::unknown_installation(id))
    }

    fn list(&self) -> Vec<InstallationConfig> {
        self.installations.clone()
    }
}
