//! Special actions with a resource cost.
//!
//! Techniques are immutable definitions shared between combatants. The set of
//! variants is closed; resolution dispatches on [`Technique`] with `match`.

use std::fmt;

use crate::state::DamageType;

/// What a technique does when it resolves.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TechniqueKind {
    /// Deals typed damage to an opponent; goes through the power meter.
    Damage,
    /// Restores health to an ally.
    Heal,
    /// Restores resource to an ally.
    Support,
}

/// A named special action.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Technique {
    Damage {
        name: String,
        resource_cost: u32,
        power: u32,
        damage_type: DamageType,
    },
    Heal {
        name: String,
        resource_cost: u32,
        power: u32,
    },
    Support {
        name: String,
        resource_cost: u32,
        power: u32,
    },
}

impl Technique {
    pub fn damage(
        name: impl Into<String>,
        resource_cost: u32,
        power: u32,
        damage_type: DamageType,
    ) -> Self {
        Self::Damage {
            name: name.into(),
            resource_cost,
            power,
            damage_type,
        }
    }

    pub fn heal(name: impl Into<String>, resource_cost: u32, power: u32) -> Self {
        Self::Heal {
            name: name.into(),
            resource_cost,
            power,
        }
    }

    pub fn support(name: impl Into<String>, resource_cost: u32, power: u32) -> Self {
        Self::Support {
            name: name.into(),
            resource_cost,
            power,
        }
    }

    pub fn kind(&self) -> TechniqueKind {
        match self {
            Self::Damage { .. } => TechniqueKind::Damage,
            Self::Heal { .. } => TechniqueKind::Heal,
            Self::Support { .. } => TechniqueKind::Support,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Damage { name, .. } | Self::Heal { name, .. } | Self::Support { name, .. } => {
                name
            }
        }
    }

    pub fn resource_cost(&self) -> u32 {
        match self {
            Self::Damage { resource_cost, .. }
            | Self::Heal { resource_cost, .. }
            | Self::Support { resource_cost, .. } => *resource_cost,
        }
    }

    pub fn power(&self) -> u32 {
        match self {
            Self::Damage { power, .. } | Self::Heal { power, .. } | Self::Support { power, .. } => {
                *power
            }
        }
    }

    /// Damage type for damaging techniques; `None` for heal/support.
    pub fn damage_type(&self) -> Option<DamageType> {
        match self {
            Self::Damage { damage_type, .. } => Some(*damage_type),
            Self::Heal { .. } | Self::Support { .. } => None,
        }
    }

    /// Whether the technique is aimed at the caster's own party.
    pub fn targets_allies(&self) -> bool {
        !matches!(self, Self::Damage { .. })
    }
}

impl fmt::Display for Technique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} RP)", self.name(), self.resource_cost())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_cover_every_variant() {
        let fireball = Technique::damage("Fireball", 4, 9, DamageType::Fire);
        let mend = Technique::heal("Mend", 3, 12);
        let focus = Technique::support("Focus", 0, 5);

        assert_eq!(fireball.kind(), TechniqueKind::Damage);
        assert_eq!(fireball.damage_type(), Some(DamageType::Fire));
        assert!(!fireball.targets_allies());

        assert_eq!(mend.power(), 12);
        assert_eq!(mend.damage_type(), None);
        assert!(mend.targets_allies());

        assert_eq!(focus.resource_cost(), 0);
        assert_eq!(focus.kind().to_string(), "support");
    }

    #[test]
    fn display_includes_cost() {
        let fireball = Technique::damage("Fireball", 4, 9, DamageType::Fire);
        assert_eq!(fireball.to_string(), "Fireball (4 RP)");
    }
}
