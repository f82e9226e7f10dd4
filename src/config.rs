//! Configuration loading and parsing

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::layout::LIGHT_BAR_ZONES;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    /// Seconds to wait for a firmware reply; no limit when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    /// Custom color names
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub colors: HashMap<String, Color>,
    /// Light bar preset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub light_bar: Option<[Color; LIGHT_BAR_ZONES]>,
}

impl Config {
    /// Load config from the default location
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// Load config from a specific path. A missing file gives the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("No config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read config from {}", path.display()));
            }
        };
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Get the default config path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("lomen");
        Ok(config_dir.join("config.json"))
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Parse a color, trying custom names before built-in names and hex codes
    pub fn parse_color(&self, s: &str) -> crate::Result<Color> {
        let s = s.trim();
        match self.colors.iter().find(|(name, _)| name.eq_ignore_ascii_case(s)) {
            Some((_, color)) => Ok(*color),
            None => s.parse(),
        }
    }
}
