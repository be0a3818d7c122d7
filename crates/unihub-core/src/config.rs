use std::fs;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_PER_PAGE: usize = 10;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UnihubConfig {
    pub version: u32,
    pub backend: BackendConfig,
    #[serde(default)]
    pub wizard: WizardConfig,
    #[serde(default)]
    pub projects: ProjectsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WizardConfig {
    /// Root-relative paths (trailing slash) that can never be deselected in
    /// the file picker.
    #[serde(default = "default_pinned_paths")]
    pub pinned_paths: Vec<String>,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            pinned_paths: default_pinned_paths(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProjectsConfig {
    #[serde(default = "default_per_page")]
    pub per_page: usize,
}

impl Default for ProjectsConfig {
    fn default() -> Self {
        Self {
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

pub fn default_pinned_paths() -> Vec<String> {
    vec!["package.json/".to_string(), "package.json.meta/".to_string()]
}

fn default_per_page() -> usize {
    DEFAULT_PER_PAGE
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not resolve home directory for config path")]
    HomeDirectoryUnavailable,
    #[error("failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config: {message}")]
    Validation { message: String },
}

pub fn resolve_config_path() -> anyhow::Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or(ConfigError::HomeDirectoryUnavailable)?;
    Ok(base_dirs
        .home_dir()
        .join(".config")
        .join("unihub")
        .join("config.toml"))
}

pub fn load_config(path: &Path) -> Result<UnihubConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let parsed: UnihubConfig = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    validate_config(&parsed)?;
    Ok(parsed)
}

pub fn validate_config(config: &UnihubConfig) -> Result<(), ConfigError> {
    if config.version != 1 {
        return Err(ConfigError::Validation {
            message: "version must be 1".to_string(),
        });
    }

    if config.backend.program.trim().is_empty() {
        return Err(ConfigError::Validation {
            message: "backend.program must be non-empty".to_string(),
        });
    }

    for (index, path) in config.wizard.pinned_paths.iter().enumerate() {
        if path.trim().is_empty() || !path.ends_with('/') {
            return Err(ConfigError::Validation {
                message: format!(
                    "wizard.pinned_paths[{index}] must be a non-empty path ending in '/'"
                ),
            });
        }
    }

    if config.projects.per_page == 0 {
        return Err(ConfigError::Validation {
            message: "projects.per_page must be at least 1".to_string(),
        });
    }

    Ok(())
}
