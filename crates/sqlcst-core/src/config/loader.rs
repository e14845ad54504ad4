//! Configuration file discovery and loading

use super::options::RawFormatOptions;
use crate::error::SqlcstError;
use crate::result::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// File names searched for, in priority order
pub const CONFIG_FILE_NAMES: &[&str] = &[".sqlcst.toml", ".sqlcst.json"];

/// Configuration loader for discovering and loading config files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Auto-discover a config file by traversing upward from `start_path`
    ///
    /// Each directory is checked for the names in [`CONFIG_FILE_NAMES`]
    /// before moving on to its parent, until the filesystem root.
    pub fn auto_discover(start_path: &Path) -> Result<Option<PathBuf>> {
        let mut current = start_path
            .canonicalize()
            .map_err(|e| SqlcstError::config_error(format!("Invalid path: {e}")))?;

        loop {
            for filename in CONFIG_FILE_NAMES {
                let config_path = current.join(filename);
                if config_path.is_file() {
                    tracing::debug!("Found config: {}", config_path.display());
                    return Ok(Some(config_path));
                }
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => break,
            }
        }

        Ok(None)
    }

    /// Load options from a `.toml` or `.json` file
    pub fn load_from_file(path: &Path) -> Result<RawFormatOptions> {
        let content =
            fs::read_to_string(path).map_err(|e| SqlcstError::io_error(path, e))?;
        let parsed = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => toml::from_str(&content).map_err(|e| e.to_string()),
            Some("json") => serde_json::from_str(&content).map_err(|e| e.to_string()),
            _ => Err("unsupported file extension (expected .toml or .json)".to_string()),
        };
        parsed.map_err(|message| {
            SqlcstError::config_error(format!(
                "Failed to load config from '{}': {message}",
                path.display()
            ))
        })
    }

    /// Load options from `custom_path`, or from the file discovered from `start_dir`
    ///
    /// A missing explicit path is an error; finding nothing during discovery
    /// yields the empty option set.
    pub fn load(custom_path: Option<&Path>, start_dir: &Path) -> Result<RawFormatOptions> {
        let config_path = match custom_path {
            Some(path) if !path.exists() => {
                return Err(SqlcstError::config_error(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            Some(path) => path.to_path_buf(),
            None => match Self::auto_discover(start_dir)? {
                Some(path) => path,
                None => return Ok(RawFormatOptions::default()),
            },
        };

        Self::load_from_file(&config_path)
    }
}
