//! Scanner tunables
//!
//! Every distance and limit used by the heuristic scanners lives here so a
//! format drift can be answered with a config file instead of a rebuild.
//! Defaults reproduce the values observed in shipped saves.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Smallest accepted `window_overlap`: 100 UTF-16 units, the longest
/// shop identifier observed
pub const MIN_WINDOW_OVERLAP: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Bytes per named-shop scan window
    pub window_size: usize,
    /// Extra bytes read past each window so identifiers crossing the
    /// boundary are decoded whole
    pub window_overlap: usize,
    /// How far back from a shop marker section markers are searched
    pub section_lookback: usize,
    /// How far back from a trader marker the `lt` location tag is searched
    pub location_lookback: usize,
    /// How far back from a trader marker the `.actors` field is searched
    pub actors_lookback: usize,
    /// Max bytes scanned after an item name for its `slruck` quantity tag
    pub item_metadata_distance: usize,
    /// Prefix of the primary payload scanned by the legacy hero-name heuristic
    pub hero_scan_limit: usize,
    /// Forward bound for hero inventory sections
    pub hero_inventory_window: usize,
    /// Raise the identifier minimum length from 3 to 5
    pub legacy_identifiers: bool,
    /// Zip-bomb guard: max summed uncompressed size of a `.sav` archive
    pub max_archive_size: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            window_size: 10_000,
            window_overlap: 512,
            section_lookback: 5_000,
            location_lookback: 2_000,
            actors_lookback: 3_000,
            item_metadata_distance: 125,
            hero_scan_limit: 100_000,
            hero_inventory_window: 200_000,
            legacy_identifiers: cfg!(feature = "legacy-identifiers"),
            max_archive_size: 10 * 1024 * 1024,
        }
    }
}

impl ScanConfig {
    /// Load config from a TOML file; missing keys keep their defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        debug!("Loaded scan config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }

    fn validate(&self) -> Result<()> {
        if self.window_size == 0 {
            return Err(Error::Config("window_size must be positive".into()));
        }
        if self.window_overlap < MIN_WINDOW_OVERLAP {
            return Err(Error::Config(format!(
                "window_overlap must be at least {MIN_WINDOW_OVERLAP} bytes"
            )));
        }
        if self.window_overlap % 2 != 0 {
            return Err(Error::Config(
                "window_overlap must be even (UTF-16 units are 2 bytes)".into(),
            ));
        }
        if self.window_size % 2 != 0 {
            return Err(Error::Config("window_size must be even".into()));
        }
        Ok(())
    }

    /// Minimum accepted identifier length
    pub fn min_identifier_len(&self) -> usize {
        if self.legacy_identifiers { 5 } else { 3 }
    }
}
