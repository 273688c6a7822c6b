//! Combatant template and encounter loader.
//!
//! A roster file lists the starting party, enemy templates keyed by id, and
//! encounters that name the enemies they spawn. Techniques are referenced by
//! name and resolved against a [`TechniqueCatalog`] at load time.

use std::collections::BTreeMap;
use std::path::Path;

use combat_core::{CombatEntity, CombatantKind, RatingTable, RosterOracle};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, TechniqueCatalog, read_file};

/// Data-file form of a combatant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatantTemplate {
    pub name: String,
    pub health: u32,
    #[serde(default)]
    pub resource: u32,
    #[serde(default)]
    pub speed: i32,
    /// Sparse per-type overrides; unspecified types use the baseline rating.
    #[serde(default)]
    pub ratings: RatingTable,
    /// Technique names, resolved against the technique catalog.
    #[serde(default)]
    pub techniques: Vec<String>,
}

impl CombatantTemplate {
    /// Builds a combatant at full health and resource.
    pub fn spawn(
        &self,
        kind: CombatantKind,
        catalog: &TechniqueCatalog,
    ) -> LoadResult<CombatEntity> {
        let techniques = catalog
            .resolve(&self.techniques)
            .map_err(|e| anyhow::anyhow!("Combatant '{}': {}", self.name, e))?;

        Ok(
            CombatEntity::new(self.name.clone(), kind, self.health, self.resource)
                .with_speed(self.speed)
                .with_ratings(self.ratings.clone())
                .with_techniques(techniques),
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RosterFile {
    #[serde(default)]
    party: Vec<CombatantTemplate>,
    #[serde(default)]
    enemies: BTreeMap<String, CombatantTemplate>,
    #[serde(default)]
    encounters: BTreeMap<String, Vec<String>>,
}

/// Resolved party, enemies and encounters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RosterCatalog {
    party: Vec<CombatEntity>,
    enemies: BTreeMap<String, CombatEntity>,
    encounters: BTreeMap<String, Vec<String>>,
}

impl RosterCatalog {
    /// Fresh copy of the starting party.
    pub fn party(&self) -> Vec<CombatEntity> {
        self.party.clone()
    }

    /// Fresh copy of one enemy template.
    pub fn enemy(&self, enemy_id: &str) -> Option<CombatEntity> {
        self.enemies.get(enemy_id).cloned()
    }
}

impl RosterOracle for RosterCatalog {
    fn encounter(&self, encounter_id: &str) -> Option<Vec<CombatEntity>> {
        self.encounters
            .get(encounter_id)?
            .iter()
            .map(|enemy_id| self.enemy(enemy_id))
            .collect()
    }

    fn encounter_ids(&self) -> Vec<String> {
        self.encounters.keys().cloned().collect()
    }
}

/// Loader for roster files from RON.
pub struct RosterLoader;

impl RosterLoader {
    /// Load a roster from a RON file, resolving technique names.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the RON file
    /// * `catalog` - Techniques the roster may reference
    pub fn load(path: &Path, catalog: &TechniqueCatalog) -> LoadResult<RosterCatalog> {
        let content = read_file(path)?;
        Self::parse(&content, catalog)
    }

    pub fn parse(content: &str, catalog: &TechniqueCatalog) -> LoadResult<RosterCatalog> {
        let file: RosterFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse roster RON: {}", e))?;

        let party = file
            .party
            .iter()
            .map(|template| template.spawn(CombatantKind::Player, catalog))
            .collect::<LoadResult<Vec<_>>>()?;

        let mut enemies = BTreeMap::new();
        for (enemy_id, template) in &file.enemies {
            let enemy = template
                .spawn(CombatantKind::Enemy, catalog)
                .map_err(|e| anyhow::anyhow!("Enemy '{}': {}", enemy_id, e))?;
            enemies.insert(enemy_id.clone(), enemy);
        }

        for (encounter_id, members) in &file.encounters {
            if members.is_empty() {
                return Err(anyhow::anyhow!("Encounter '{}' has no enemies", encounter_id));
            }
            if let Some(unknown) = members.iter().find(|id| !enemies.contains_key(*id)) {
                return Err(anyhow::anyhow!(
                    "Encounter '{}' references unknown enemy '{}'",
                    encounter_id,
                    unknown
                ));
            }
        }

        tracing::debug!(
            party = party.len(),
            enemies = enemies.len(),
            encounters = file.encounters.len(),
            "roster loaded"
        );

        Ok(RosterCatalog {
            party,
            enemies,
            encounters: file.encounters,
        })
    }
}
