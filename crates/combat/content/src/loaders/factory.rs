//! Content factory for loading everything from one data directory.

use std::path::{Path, PathBuf};

use combat_core::CombatConfig;

use crate::loaders::{
    ConfigLoader, LoadResult, RosterCatalog, RosterLoader, TechniqueCatalog, TechniqueLoader,
};

/// Content factory that loads combat content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── techniques.ron
/// └── roster.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub const CONFIG_FILE: &'static str = "config.toml";
    pub const TECHNIQUES_FILE: &'static str = "techniques.ron";
    pub const ROSTER_FILE: &'static str = "roster.ron";

    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Load combat configuration from `config.toml`, or defaults if the file
    /// does not exist.
    pub fn load_config(&self) -> LoadResult<CombatConfig> {
        let path = self.data_dir.join(Self::CONFIG_FILE);
        if !path.exists() {
            tracing::info!(path = %path.display(), "no config file, using defaults");
            return Ok(CombatConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load the technique catalog from `techniques.ron`.
    pub fn load_techniques(&self) -> LoadResult<TechniqueCatalog> {
        TechniqueLoader::load(&self.data_dir.join(Self::TECHNIQUES_FILE))
    }

    /// Load the roster from `roster.ron`, resolving techniques from `techniques.ron`.
    pub fn load_roster(&self) -> LoadResult<RosterCatalog> {
        let techniques = self.load_techniques()?;
        RosterLoader::load(&self.data_dir.join(Self::ROSTER_FILE), &techniques)
    }
}
