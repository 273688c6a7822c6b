//! Loads everything a session needs before the first frame.

use anyhow::{Context, Result, anyhow};
use combat_content::{ConfigLoader, ContentFactory, RosterLoader};
use combat_core::{CombatConfig, CombatEntity, RosterOracle};
use tracing::info;

use crate::config::SkirmishConfig;

/// Engine configuration plus both parties for one encounter.
#[derive(Clone, Debug)]
pub struct BattleSetup {
    pub config: CombatConfig,
    pub encounter_id: String,
    pub party: Vec<CombatEntity>,
    pub enemies: Vec<CombatEntity>,
}

impl BattleSetup {
    pub fn load(settings: &SkirmishConfig) -> Result<Self> {
        let factory = ContentFactory::new(&settings.data_dir);

        let config = match &settings.config_path {
            Some(path) => ConfigLoader::load(path)?,
            None => factory.load_config()?,
        };

        let roster = match &settings.roster_path {
            Some(path) => RosterLoader::load(path, &factory.load_techniques()?)?,
            None => factory.load_roster()?,
        };

        let encounter_id = match &settings.encounter {
            Some(id) => id.clone(),
            None => roster
                .encounter_ids()
                .into_iter()
                .next()
                .ok_or_else(|| anyhow!("roster defines no encounters"))?,
        };
        let enemies = roster
            .encounter(&encounter_id)
            .with_context(|| format!("unknown encounter `{encounter_id}`"))?;

        info!(
            encounter = %encounter_id,
            party = roster.party().len(),
            enemies = enemies.len(),
            "battle content loaded"
        );

        Ok(Self {
            config,
            party: roster.party(),
            encounter_id,
            enemies,
        })
    }
}
