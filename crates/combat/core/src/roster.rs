//! Read-only enemy data.
//!
//! A [`RosterOracle`] hands out fresh enemy parties by encounter id. The
//! content crate backs it with RON catalogs; [`StaticRoster`] is the
//! in-memory version used by tests and hosts that build parties in code.

use std::collections::BTreeMap;

use crate::state::{CombatEntity, CombatantKind};

/// Source of enemy parties.
pub trait RosterOracle: Send + Sync {
    /// Returns a new enemy party for `encounter_id`, or `None` if unknown.
    ///
    /// Every call yields fresh combatants at full health.
    fn encounter(&self, encounter_id: &str) -> Option<Vec<CombatEntity>>;

    /// All encounter ids this oracle can produce.
    fn encounter_ids(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Encounters held in memory.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StaticRoster {
    encounters: BTreeMap<String, Vec<CombatEntity>>,
}

impl StaticRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an encounter. Non-enemy combatants are skipped.
    pub fn with_encounter(
        mut self,
        encounter_id: impl Into<String>,
        enemies: impl IntoIterator<Item = CombatEntity>,
    ) -> Self {
        let enemies = enemies
            .into_iter()
            .filter(|enemy| enemy.kind() == CombatantKind::Enemy)
            .collect();
        self.encounters.insert(encounter_id.into(), enemies);
        self
    }
}

impl RosterOracle for StaticRoster {
    fn encounter(&self, encounter_id: &str) -> Option<Vec<CombatEntity>> {
        self.encounters.get(encounter_id).cloned()
    }

    fn encounter_ids(&self) -> Vec<String> {
        self.encounters.keys().cloned().collect()
    }
}
