//! JSON-backed level configuration file.
//!
//! The file holds a `format_version` next to the [`LevelConfig`] itself so a
//! future layout change can be detected instead of silently misread.

use std::error::Error;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::LevelConfig;

pub const CONFIG_FORMAT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LevelConfigFile {
    pub format_version: u32,
    pub config: LevelConfig,
}

#[derive(Debug)]
pub enum ConfigLoadError {
    Io(io::Error),
    Parse(String),
    UnsupportedVersion(u32),
    Invalid(String),
}

impl fmt::Display for ConfigLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "config I/O error: {e}"),
            Self::Parse(message) => write!(f, "config is not valid JSON: {message}"),
            Self::UnsupportedVersion(version) => write!(
                f,
                "config format version {version} is not supported (expected {CONFIG_FORMAT_VERSION})"
            ),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigLoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl LevelConfigFile {
    pub fn new(config: LevelConfig) -> Self {
        Self { format_version: CONFIG_FORMAT_VERSION, config }
    }

    pub fn write_atomic(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(self).map_err(io::Error::other)?;
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, path)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path).map_err(ConfigLoadError::Io)?;
        let file: Self =
            serde_json::from_str(&content).map_err(|e| ConfigLoadError::Parse(e.to_string()))?;
        if file.format_version != CONFIG_FORMAT_VERSION {
            return Err(ConfigLoadError::UnsupportedVersion(file.format_version));
        }
        file.config.check().map_err(ConfigLoadError::Invalid)?;
        Ok(file)
    }
}
