//! Optional `fax.toml` configuration, searched for the way `faxt` searches for its own config:
//! current directory, then the user's home directory, then the system configuration directory.
//! Absence of a file anywhere on the search path is not an error — it just means defaults.

use dirs::{config_dir, home_dir};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{CompileError, Result};

pub const CONFIG_FILE_NAME: &str = "fax.toml";

/// Driver-wide defaults a `fax.toml` file can override.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Run the optimizer by default.
    #[serde(default = "default_true")]
    pub optimize: bool,

    /// What `--emit` defaults to when the flag is absent.
    #[serde(default = "default_emit")]
    pub emit: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

fn default_true() -> bool {
    true
}

fn default_emit() -> String {
    "target".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            optimize: default_true(),
            emit: default_emit(),
            verbose: false,
        }
    }
}

impl Config {
    /// Loads config from the first location found on the search path, or defaults if none exist.
    pub fn load() -> Result<Self> {
        match Self::find_config_file() {
            Some(path) => Self::load_from_path(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CompileError::Config(format!(
                "configuration file not found: {}",
                path.display()
            )));
        }
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    fn check_current_dir_config() -> Option<PathBuf> {
        let path = PathBuf::from(CONFIG_FILE_NAME);
        path.exists().then_some(path)
    }

    fn check_home_config() -> Option<PathBuf> {
        home_dir()
            .map(|dir| dir.join(".config").join("fax").join(CONFIG_FILE_NAME))
            .filter(|path| path.exists())
    }

    fn check_system_config() -> Option<PathBuf> {
        config_dir()
            .map(|dir| dir.join("fax").join(CONFIG_FILE_NAME))
            .filter(|path| path.exists())
    }

    fn find_config_file() -> Option<PathBuf> {
        Self::check_current_dir_config()
            .or_else(Self::check_home_config)
            .or_else(Self::check_system_config)
    }
}
