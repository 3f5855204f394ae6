use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs, io};

use dirs::config_dir;
use serde::{Deserialize, Serialize};

use crate::assigner::AssignError;
use crate::palette::{Palette, PaletteError, Rgb, DEFAULT_PALETTE};

pub const CONFIG_PATH_ENV: &str = "COMPOUND_PALETTE_CONFIG";

const DEFAULT_TIMEOUT_SECS: f64 = 1.0;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config directory unavailable")]
    MissingConfigDir,
    #[error("expiry timeout must be a positive number of seconds, got {0}")]
    NonPositiveTimeout(f64),
    #[error(transparent)]
    Palette(#[from] PaletteError),
    #[error(transparent)]
    Assign(#[from] AssignError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}

/// On-disk assigner settings. Missing fields fall back to the defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssignerConfig {
    pub timeout_secs: f64,
    pub palette: Vec<Rgb>,
}

impl Default for AssignerConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            palette: DEFAULT_PALETTE.to_vec(),
        }
    }
}

impl AssignerConfig {
    pub fn validate(&self) -> Result<(Palette, Duration), ConfigError> {
        let timeout = Duration::try_from_secs_f64(self.timeout_secs)
            .ok()
            .filter(|timeout| !timeout.is_zero())
            .ok_or(ConfigError::NonPositiveTimeout(self.timeout_secs))?;

        let palette = Palette::new(self.palette.clone())?;
        Ok((palette, timeout))
    }

    pub fn load() -> Result<Self, ConfigError> {
        let path = get_config_path()?;
        Self::load_from_path(path)
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => {
                let config: Self = serde_json::from_str(&contents)?;
                config.validate()?;
                Ok(config)
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(err.into()),
        }
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let data = serde_json::to_vec_pretty(self)?;
        fs::write(path, data)?;
        Ok(())
    }
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    if let Ok(custom) = env::var(CONFIG_PATH_ENV) {
        return Ok(PathBuf::from(custom));
    }
    let base = config_dir().ok_or(ConfigError::MissingConfigDir)?;
    Ok(base.join("compound-palette").join("config.json"))
}
