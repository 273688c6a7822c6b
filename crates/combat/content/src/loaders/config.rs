//! Combat configuration loader.

use std::path::Path;

use combat_core::{CombatConfig, PowerMeter};

use crate::loaders::{LoadResult, read_file};

/// Loader for combat configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Missing keys fall back to [`CombatConfig::default`]. Meter patterns are
    /// parsed here so a bad layout is reported at load time rather than when
    /// the combat system is built.
    pub fn load(path: &Path) -> LoadResult<CombatConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse config from TOML text.
    pub fn parse(content: &str) -> LoadResult<CombatConfig> {
        let config: CombatConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        PowerMeter::from_rules(&config.meter)
            .map_err(|e| anyhow::anyhow!("Invalid power meter in config: {}", e))?;

        Ok(config)
    }
}
