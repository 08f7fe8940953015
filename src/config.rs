use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::models::{MAX_DURATION_WEEKS, MIN_DURATION_WEEKS};

const APP_NAME: &str = "timeline-builder";
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding where project documents are stored.
pub const DIR_ENV: &str = "TIMELINE_BUILDER_DIR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding saved project documents. Defaults to the platform
    /// data directory.
    pub data_dir: Option<PathBuf>,
    /// Width of the bar area of the Gantt chart, in columns.
    pub chart_width: usize,
    /// Duration used when a phase is added without one.
    pub default_phase_weeks: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            chart_width: 40,
            default_phase_weeks: 2,
        }
    }
}

impl AppConfig {
    /// Read `<config_dir>/timeline-builder/config.json`. Any problem with the
    /// file is logged and the built-in settings are used instead.
    pub fn load() -> Self {
        config_path()
            .and_then(|path| Self::read_from(&path))
            .unwrap_or_else(|e| {
                tracing::warn!("Ignoring config file: {:#}", e);
                Self::default()
            })
    }

    /// Write these settings to the per-user config file.
    pub fn save(&self) -> Result<()> {
        self.write_to(&config_path()?)
    }

    /// Settings stored at `path`. A missing file yields the defaults.
    pub fn read_from(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(content) => Self::from_json(&content)
                .with_context(|| format!("Invalid config in {}", path.display())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e).with_context(|| format!("Cannot read {}", path.display())),
        }
    }

    /// Store these settings at `path`, creating its directory as needed.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create {}", parent.display()))?;
        }
        let body = serde_json::to_string_pretty(self)?;
        fs::write(path, body).with_context(|| format!("Cannot write {}", path.display()))
    }

    /// Parse settings, pulling `default_phase_weeks` into the allowed
    /// phase duration range.
    pub fn from_json(content: &str) -> Result<Self> {
        let mut config: Self = serde_json::from_str(content)?;
        config.default_phase_weeks = config
            .default_phase_weeks
            .clamp(MIN_DURATION_WEEKS, MAX_DURATION_WEEKS);
        Ok(config)
    }

    /// Storage directory: explicit override, then `TIMELINE_BUILDER_DIR`,
    /// then the configured `data_dir`. `None` means the platform default.
    pub fn storage_dir(&self, cli_override: Option<PathBuf>) -> Option<PathBuf> {
        cli_override
            .or_else(|| std::env::var_os(DIR_ENV).map(PathBuf::from))
            .or_else(|| self.data_dir.clone())
    }
}

fn config_path() -> Result<PathBuf> {
    let base = config_dir().context("No per-user config directory on this platform")?;
    Ok(base.join(APP_NAME).join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{ "chart_width": 60 }"#).unwrap();
        assert_eq!(config.chart_width, 60);
        assert_eq!(config.default_phase_weeks, 2);
        assert!(config.data_dir.is_none());
    }

    #[test]
    fn test_from_json_clamps_default_weeks() {
        let config = AppConfig::from_json(r#"{ "default_phase_weeks": 0 }"#).unwrap();
        assert_eq!(config.default_phase_weeks, 1);

        let config = AppConfig::from_json(r#"{ "default_phase_weeks": 99 }"#).unwrap();
        assert_eq!(config.default_phase_weeks, 52);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = AppConfig::read_from(&temp_dir.path().join("config.json")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(AppConfig::read_from(&path).is_err());
    }

    #[test]
    fn test_write_then_read() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("config.json");
        let config = AppConfig {
            data_dir: Some(PathBuf::from("/projects")),
            chart_width: 72,
            default_phase_weeks: 4,
        };

        config.write_to(&path).unwrap();
        assert_eq!(AppConfig::read_from(&path).unwrap(), config);
    }

    #[test]
    fn test_cli_override_wins() {
        let config = AppConfig {
            data_dir: Some(PathBuf::from("/configured")),
            ..AppConfig::default()
        };
        assert_eq!(
            config.storage_dir(Some(PathBuf::from("/from/flag"))),
            Some(PathBuf::from("/from/flag"))
        );
    }
}
