// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and validate it.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    debug!(path = %path.as_ref().display(), ?config, "loaded configuration");
    Ok(config)
}

/// Load `path` if given, otherwise `Flw.toml` if it exists, otherwise the
/// built-in defaults.
pub fn load_or_default(path: Option<&Path>) -> Result<ConfigFile> {
    match path {
        Some(path) => load_and_validate(path),
        None => {
            let default_path = default_config_path();
            if default_path.is_file() {
                load_and_validate(default_path)
            } else {
                Ok(ConfigFile::default())
            }
        }
    }
}

/// Default config location: `Flw.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Flw.toml")
}
