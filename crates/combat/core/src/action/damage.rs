//! Damage calculation.

use crate::config::DamageRules;
use crate::state::{CombatEntity, DamageType};

/// Calculate the damage one combatant deals to another.
///
/// # Formula
///
/// ```text
/// base    = attacker.attack[type] + technique_power
/// scaled  = floor(base * attacker.critical_damage_modifier)
/// reduced = scaled - defender.defense[type]
/// final   = max(reduced, minimum)        // minimum is at least 1
/// ```
///
/// # Arguments
///
/// * `attacker` - Combatant performing the action
/// * `defender` - Combatant receiving the damage
/// * `damage_type` - Rating pair to read on both sides
/// * `technique_power` - Extra power from a damaging technique (0 for a basic attack)
/// * `rules` - Damage floor parameters
pub fn calculate_damage(
    attacker: &CombatEntity,
    defender: &CombatEntity,
    damage_type: DamageType,
    technique_power: u32,
    rules: &DamageRules,
) -> u32 {
    let base = attacker
        .rating(damage_type)
        .attack
        .saturating_add(technique_power);
    let scaled = scale(base, attacker.critical_damage_modifier());
    let reduced = scaled.saturating_sub(defender.rating(damage_type).defense);

    reduced.max(rules.floor())
}

/// Multiply by a non-negative modifier, truncating toward zero.
fn scale(base: u32, modifier: f32) -> u32 {
    let scaled = (base as f64 * f64::from(modifier.max(0.0))).floor();
    if scaled >= u32::MAX as f64 {
        u32::MAX
    } else {
        scaled as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::CombatRating;

    fn attacker(attack: u32, modifier: f32) -> CombatEntity {
        let mut entity = CombatEntity::player("Hero", 20, 0)
            .with_rating(DamageType::Physical, CombatRating::new(attack, 0))
            .with_rating(DamageType::Fire, CombatRating::new(attack * 2, 0));
        entity.set_critical_damage_modifier(modifier);
        entity
    }

    fn defender(defense: u32) -> CombatEntity {
        CombatEntity::enemy("Golem", 50, 0)
            .with_rating(DamageType::Physical, CombatRating::new(5, defense))
    }

    #[test]
    fn basic_attack_subtracts_defense() {
        let damage = calculate_damage(
            &attacker(10, 1.0),
            &defender(3),
            DamageType::Physical,
            0,
            &DamageRules::default(),
        );
        assert_eq!(damage, 7);
    }

    #[test]
    fn modifier_applies_before_defense() {
        let damage = calculate_damage(
            &attacker(10, 1.5),
            &defender(3),
            DamageType::Physical,
            0,
            &DamageRules::default(),
        );
        assert_eq!(damage, 12);
    }

    #[test]
    fn technique_power_uses_technique_type() {
        let damage = calculate_damage(
            &attacker(4, 1.0),
            &defender(100),
            DamageType::Fire,
            6,
            &DamageRules::default(),
        );
        // Fire attack 8 + power 6, golem has baseline fire defense 0.
        assert_eq!(damage, 14);
    }

    #[test]
    fn damage_never_drops_below_one() {
        for defense in [0, 10, 1_000, u32::MAX] {
            for modifier in [0.0, 0.5, 1.0, 3.375] {
                let damage = calculate_damage(
                    &attacker(10, modifier),
                    &defender(defense),
                    DamageType::Physical,
                    0,
                    &DamageRules { minimum: 0 },
                );
                assert!(damage >= 1, "defense={defense} modifier={modifier}");
            }
        }
    }
}
