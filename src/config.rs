//! Optional user defaults loaded from `~/.httpie/config.yaml`

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{CONFIG_DIR, CONFIG_FILE};
use crate::pretty::Style;

/// Defaults applied when the matching flag is absent from the command line
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub style: Option<Style>,
    /// Seconds
    pub timeout: Option<f64>,
}

impl Config {
    /// Location of the config file, if a home directory is known
    pub fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load the user's config; a missing or broken file yields the defaults
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            return Config::default();
        };
        if !path.exists() {
            return Config::default();
        }

        match Self::load_from(&path) {
            Ok(config) => {
                tracing::debug!(path = %path.display(), ?config, "Loaded config");
                config
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring config file");
                Config::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        if content.trim().is_empty() {
            return Ok(Config::default());
        }
        let config = serde_yaml::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_from_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "style: monokai\ntimeout: 2.5").unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.style, Some(Style::Monokai));
        assert_eq!(config.timeout, Some(2.5));
    }

    #[test]
    fn test_partial_and_empty_files() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "timeout: 1").unwrap();
        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.style, None);
        assert_eq!(config.timeout, Some(1.0));

        let empty = tempfile::NamedTempFile::new().unwrap();
        assert_eq!(Config::load_from(empty.path()).unwrap(), Config::default());
    }

    #[test]
    fn test_unknown_style_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "style: rainbow").unwrap();
        assert!(Config::load_from(file.path()).is_err());
    }
}
