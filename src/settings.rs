use std::path::{Path, PathBuf};
use std::{env, fs};

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Environment variable naming a settings file.
pub const CONFIG_ENV: &str = "MYOVAE_CYCLE_CONFIG";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

/// Tunable constants for phase and prediction math.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Cycle length assumed when no history average is available.
    pub default_cycle_length: u32,
    /// Days from ovulation to the next period.
    pub luteal_phase_days: u32,
    /// Cycle days always reported as menstrual.
    pub menstrual_days: u32,
    /// Days before ovulation where the fertile window opens.
    pub fertile_window_days: u32,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_cycle_length: 28,
            luteal_phase_days: 14,
            menstrual_days: 5,
            fertile_window_days: 5,
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.default_cycle_length == 0 {
            return Err(SettingsError::Zero("defaultCycleLength"));
        }
        if self.menstrual_days == 0 {
            return Err(SettingsError::Zero("menstrualDays"));
        }
        Ok(())
    }

    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let raw = fs::read(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings =
            serde_json::from_slice(&raw).map_err(|source| SettingsError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Resolve settings from an explicit path, then `MYOVAE_CYCLE_CONFIG`,
    /// then `<config dir>/myovae/cycle.json`, falling back to defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, SettingsError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        if let Ok(path) = env::var(CONFIG_ENV) {
            return Self::from_file(Path::new(&path));
        }
        match default_config_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => {
                debug!("no settings file found, using defaults");
                Ok(Self::default())
            }
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("myovae").join("cycle.json"))
}
