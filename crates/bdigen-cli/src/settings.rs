use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Settings file picked up from the working directory when `--config` is not
/// given.
pub const DEFAULT_SETTINGS_FILE: &str = "bdigen.toml";

pub const DEFAULT_MAPPING: &str = "mappings/bdi.mapping.yml";
pub const DEFAULT_RUN_DIR: &str = "runs";
pub const DEFAULT_NUM_RECORDS: u64 = 100;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid settings in {path}: {source}")]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub generate: GenerateSettings,
    pub business_process: BusinessProcessSettings,
}

/// Defaults for `bdigen generate`; flags win over these.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerateSettings {
    pub database_url: Option<String>,
    pub mapping: Option<PathBuf>,
    pub num_records: Option<u64>,
    pub run_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BusinessProcessSettings {
    pub describe: Option<PathBuf>,
    pub deploy_dir: Option<PathBuf>,
}

/// Load `explicit`, or `bdigen.toml` in the working directory if present.
/// A missing default file yields empty settings; a missing explicit one is
/// an error.
pub fn load_settings(explicit: Option<&Path>) -> Result<Settings, SettingsError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let path = PathBuf::from(DEFAULT_SETTINGS_FILE);
            if !path.exists() {
                return Ok(Settings::default());
            }
            path
        }
    };

    let content = std::fs::read_to_string(&path).map_err(|source| SettingsError::Io {
        path: path.clone(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| SettingsError::Toml { path, source })
}
