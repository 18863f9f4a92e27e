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

use anyhow::{Context, Result, anyhow, bail};
use chrono_tz::Tz;
use hydrowatch_core::{FlowUnit, InstallationConfig};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub data: DataSettings,
    #[serde(default)]
    pub installations: Vec<InstallationSettings>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Upper bound on the chart response time. It does not cancel a file
    /// read already in progress, which finishes in the background.
    #[serde(default = "default_source_timeout_secs")]
    pub source_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataSettings {
    /// Base directory of the monitoring files
    #[serde(default = "default_data_root")]
    pub root: PathBuf,
    /// IANA zone of the timeline timestamps and of "today"
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InstallationSettings {
    pub nickname: String,
    pub name: String,
    #[serde(default)]
    pub flow_unit: FlowUnit,
    pub year_timeline: TimelineFile,
}

/// Location of a timeline file, relative to `data.root`
#[derive(Debug, Clone, Deserialize)]
pub struct TimelineFile {
    pub folder: String,
    pub file: String,
}

fn default_bind_address() -> String {
    "0.0.0.0".to_owned()
}

fn default_port() -> u16 {
    8100
}

fn default_source_timeout_secs() -> u64 {
    30
}

fn default_data_root() -> PathBuf {
    PathBuf::from("./data")
}

fn default_timezone() -> String {
    "Europe/Rome".to_owned()
}

fn default_delimiter() -> String {
    ",".to_owned()
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            source_timeout_secs: default_source_timeout_secs(),
        }
    }
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            root: default_data_root(),
            timezone: default_timezone(),
            delimiter: default_delimiter(),
        }
    }
}

impl ServerSettings {
    #[must_use]
    pub fn source_timeout(&self) -> Duration {
        Duration::from_secs(self.source_timeout_secs)
    }

    #[must_use]
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

impl DataSettings {
    pub fn timezone(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| anyhow!("data.timezone '{}' is not a known IANA zone", self.timezone))
    }

    pub fn delimiter_byte(&self) -> Result<u8> {
        match self.delimiter.as_bytes() {
            [b] if b.is_ascii() => Ok(*b),
            _ => bail!(
                "data.delimiter must be a single ASCII character, got '{}'",
                self.delimiter
            ),
        }
    }
}

impl InstallationSettings {
    #[must_use]
    pub fn to_installation_config(&self) -> InstallationConfig {
        InstallationConfig {
            nickname: self.nickname.clone(),
            name: self.name.clone(),
            flow_unit: self.flow_unit,
        }
    }

    #[must_use]
    pub fn timeline_path(&self, root: &Path) -> PathBuf {
        root.join(&self.year_timeline.folder)
            .join(&self.year_timeline.file)
    }
}

impl ServerConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).with_context(|| "Failed to parse config TOML")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        self.data.timezone()?;
        self.data.delimiter_byte()?;

        if self.installations.is_empty() {
            bail!("at least one [[installations]] entry is required");
        }

        let mut seen = HashSet::new();
        for inst in &self.installations {
            if inst.nickname.trim().is_empty() {
                bail!("installation nickname must not be empty");
            }
            if !seen.insert(inst.nickname.as_str()) {
                bail!("duplicate installation nickname '{}'", inst.nickname);
            }
            if inst.year_timeline.folder.trim().is_empty()
                || inst.year_timeline.file.trim().is_empty()
            {
                bail!(
                    "installation '{}' needs year_timeline.folder and year_timeline.file",
                    inst.nickname
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
[[installations]]
nickname = "mulino"
name = "Centrale Mulino"
flow_unit = "l/s"

[installations.year_timeline]
folder = "mulino"
file = "YearTL.csv"
"#;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_toml_str(MINIMAL).unwrap();
        assert_eq!(config.server.listen_address(), "0.0.0.0:8100");
        assert_eq!(config.server.source_timeout(), Duration::from_secs(30));
        assert_eq!(config.data.root, PathBuf::from("./data"));
        assert_eq!(config.data.timezone().unwrap(), chrono_tz::Europe::Rome);
        assert_eq!(config.data.delimiter_byte().unwrap(), b',');
    }

    #[test]
    fn test_installation_settings() {
        let config = ServerConfig::from_toml_str(MINIMAL).unwrap();
        let inst = &config.installations[0];
        assert_eq!(inst.flow_unit, FlowUnit::LitersPerSecond);
        assert_eq!(
            inst.timeline_path(Path::new("/srv/data")),
            PathBuf::from("/srv/data/mulino/YearTL.csv")
        );
        let cfg = inst.to_installation_config();
        assert_eq!(cfg.nickname, "mulino");
        assert_eq!(cfg.name, "Centrale Mulino");
    }

    #[test]
    fn test_flow_unit_alias_and_default() {
        let toml = r#"
[[installations]]
nickname = "diga"
name = "Diga"
flow_unit = "m³/s"
year_timeline = { folder = "diga", file = "YearTL.csv" }

[[installations]]
nickname = "canale"
name = "Canale"
year_timeline = { folder = "canale", file = "YearTL.csv" }
"#;
        let config = ServerConfig::from_toml_str(toml).unwrap();
        assert_eq!(
            config.installations[0].flow_unit,
            FlowUnit::CubicMetersPerSecond
        );
        assert_eq!(
            config.installations[1].flow_unit,
            FlowUnit::CubicMetersPerSecond
        );
    }

    #[test]
    fn test_rejects_bad_timezone() {
        let toml = format!("[data]\ntimezone = \"Mars/Olympus\"\n{MINIMAL}");
        let err = ServerConfig::from_toml_str(&toml).unwrap_err();
        assert!(err.to_string().contains("Mars/Olympus"));
    }

    #[test]
    fn test_rejects_bad_delimiter() {
        let toml = format!("[data]\ndelimiter = \";;\"\n{MINIMAL}");
        assert!(ServerConfig::from_toml_str(&toml).is_err());
    }

    #[test]
    fn test_rejects_duplicate_nickname() {
        let toml = format!("{MINIMAL}\n{MINIMAL}");
        let err = ServerConfig::from_toml_str(&toml).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_flow_unit_case_insensitive() {
        let toml = MINIMAL.replace(r#"flow_unit = "l/s""#, r#"flow_unit = " L/S ""#);
        let config = ServerConfig::from_toml_str(&toml).unwrap();
        assert_eq!(config.installations[0].flow_unit, FlowUnit::LitersPerSecond);

        let toml = MINIMAL.replace(r#"flow_unit = "l/s""#, r#"flow_unit = "gpm""#);
        assert!(ServerConfig::from_toml_str(&toml).is_err());
    }

    #[test]
    fn test_rejects_blank_nickname() {
        let toml = MINIMAL.replace(r#"nickname = "mulino""#, r#"nickname = "  ""#);
        let err = ServerConfig::from_toml_str(&toml).unwrap_err();
        assert!(err.to_string().contains("nickname must not be empty"));
    }

    #[test]
    fn test_rejects_blank_timeline_location() {
        for (field, blank) in [
            (r#"folder = "mulino""#, r#"folder = """#),
            (r#"file = "YearTL.csv""#, r#"file = " ""#),
        ] {
            let toml = MINIMAL.replace(field, blank);
            let err = ServerConfig::from_toml_str(&toml).unwrap_err();
            assert!(
                err.to_string().contains("needs year_timeline.folder"),
                "blank {field}"
            );
        }
    }

    #[test]
    fn test_rejects_no_installations() {
        assert!(ServerConfig::from_toml_str("[server]\nport = 9000\n").is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hydrowatch.toml");
        std::fs::write(&path, MINIMAL).unwrap();
        let config = ServerConfig::from_file(&path).unwrap();
        assert_eq!(config.installations.len(), 1);

        assert!(ServerConfig::from_file(&dir.path().join("missing.toml")).is_err());
    }
}
