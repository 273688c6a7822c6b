//! Damage types and per-type attack/defense ratings.

use std::collections::BTreeMap;

use strum::{EnumCount, IntoEnumIterator};

/// Damage type used to select the attack/defense pair for an action.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
    strum::EnumCount,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DamageType {
    /// Plain weapon strikes. Used by every basic attack.
    #[default]
    Physical,
    Earth,
    Wind,
    Water,
    Fire,
    Astral,
    Shadow,
}

impl DamageType {
    #[inline]
    const fn slot(self) -> usize {
        self as usize
    }
}

/// Attack/defense pair for a single damage type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatRating {
    pub attack: u32,
    pub defense: u32,
}

impl CombatRating {
    /// Rating assumed for any damage type a combatant does not specify.
    pub const BASELINE: Self = Self::new(5, 0);

    pub const fn new(attack: u32, defense: u32) -> Self {
        Self { attack, defense }
    }
}

impl Default for CombatRating {
    fn default() -> Self {
        Self::BASELINE
    }
}

/// Exactly one [`CombatRating`] per [`DamageType`].
///
/// Serialized as a sparse map; missing damage types fall back to
/// [`CombatRating::BASELINE`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(
        from = "BTreeMap<DamageType, CombatRating>",
        into = "BTreeMap<DamageType, CombatRating>"
    )
)]
pub struct RatingTable {
    ratings: [CombatRating; DamageType::COUNT],
}

impl RatingTable {
    /// Table with every damage type at the baseline rating.
    pub const fn baseline() -> Self {
        Self {
            ratings: [CombatRating::BASELINE; DamageType::COUNT],
        }
    }

    /// Table with every damage type at `baseline`.
    pub const fn uniform(baseline: CombatRating) -> Self {
        Self {
            ratings: [baseline; DamageType::COUNT],
        }
    }

    /// Overrides the rating for one damage type (builder pattern).
    #[must_use]
    pub fn with(mut self, damage_type: DamageType, rating: CombatRating) -> Self {
        self.set(damage_type, rating);
        self
    }

    #[inline]
    pub fn get(&self, damage_type: DamageType) -> CombatRating {
        self.ratings[damage_type.slot()]
    }

    pub fn set(&mut self, damage_type: DamageType, rating: CombatRating) {
        self.ratings[damage_type.slot()] = rating;
    }

    pub fn iter(&self) -> impl Iterator<Item = (DamageType, CombatRating)> + '_ {
        DamageType::iter().map(|damage_type| (damage_type, self.get(damage_type)))
    }
}

impl Default for RatingTable {
    fn default() -> Self {
        Self::baseline()
    }
}

impl From<BTreeMap<DamageType, CombatRating>> for RatingTable {
    fn from(overrides: BTreeMap<DamageType, CombatRating>) -> Self {
        overrides
            .into_iter()
            .fold(Self::baseline(), |table, (damage_type, rating)| {
                table.with(damage_type, rating)
            })
    }
}

impl From<RatingTable> for BTreeMap<DamageType, CombatRating> {
    fn from(table: RatingTable) -> Self {
        table
            .iter()
            .filter(|(_, rating)| *rating != CombatRating::BASELINE)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unspecified_types_use_baseline() {
        let table = RatingTable::baseline().with(DamageType::Fire, CombatRating::new(12, 3));

        assert_eq!(table.get(DamageType::Fire), CombatRating::new(12, 3));
        assert_eq!(table.get(DamageType::Shadow), CombatRating::new(5, 0));
        assert_eq!(table.get(DamageType::Physical), CombatRating::BASELINE);
    }

    #[test]
    fn table_has_one_entry_per_damage_type() {
        assert_eq!(RatingTable::baseline().iter().count(), 7);
    }

    #[test]
    fn damage_type_parses_case_insensitively() {
        assert_eq!("astral".parse::<DamageType>(), Ok(DamageType::Astral));
        assert_eq!("WATER".parse::<DamageType>(), Ok(DamageType::Water));
        assert_eq!(DamageType::Wind.to_string(), "wind");
    }

    #[test]
    fn sparse_map_round_trips_overrides_only() {
        let table = RatingTable::baseline().with(DamageType::Earth, CombatRating::new(8, 2));
        let sparse: BTreeMap<DamageType, CombatRating> = table.clone().into();

        assert_eq!(sparse.len(), 1);
        assert_eq!(RatingTable::from(sparse), table);
    }
}
