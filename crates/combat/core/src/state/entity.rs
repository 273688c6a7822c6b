//! Combat participants.

use std::fmt;

use super::measure::Measure;
use super::party::CombatantId;
use super::rating::{CombatRating, DamageType, RatingTable};
use crate::error::{EngineError, ErrorSeverity};
use crate::technique::Technique;

/// Which side a combatant was created for.
///
/// Player combatants outlive a battle (the party layer owns them between
/// encounters); enemy combatants are created per battle and discarded.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CombatantKind {
    Player,
    Enemy,
}

/// Errors raised by direct combatant mutation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EntityError {
    #[error("{name} cannot pay {cost} resource (has {available})")]
    InsufficientResource {
        name: String,
        cost: u32,
        available: u32,
    },
}

impl EngineError for EntityError {
    fn severity(&self) -> ErrorSeverity {
        // The selection layer must never offer an unaffordable technique.
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientResource { .. } => "ENTITY_INSUFFICIENT_RESOURCE",
        }
    }
}

/// A single participant in a battle.
///
/// # Invariants
///
/// - `health` and `resource` never exceed their maximums.
/// - `is_alive()` is derived from health and never stored.
/// - `critical_damage_modifier` is transient turn state: it is written
///   immediately before the combatant's action executes.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatEntity {
    #[cfg_attr(feature = "serde", serde(skip))]
    pub(crate) id: CombatantId,
    name: String,
    kind: CombatantKind,
    health: Measure,
    resource: Measure,
    speed: i32,
    ratings: RatingTable,
    #[cfg_attr(feature = "serde", serde(skip, default = "unit_modifier"))]
    critical_damage_modifier: f32,
    techniques: Vec<Technique>,
}

#[cfg(feature = "serde")]
fn unit_modifier() -> f32 {
    1.0
}

impl CombatEntity {
    /// Creates a combatant with full health and resource and baseline ratings.
    pub fn new(name: impl Into<String>, kind: CombatantKind, health: u32, resource: u32) -> Self {
        Self {
            id: CombatantId::default(),
            name: name.into(),
            kind,
            health: Measure::full(health),
            resource: Measure::full(resource),
            speed: 0,
            ratings: RatingTable::baseline(),
            critical_damage_modifier: 1.0,
            techniques: Vec::new(),
        }
    }

    pub fn player(name: impl Into<String>, health: u32, resource: u32) -> Self {
        Self::new(name, CombatantKind::Player, health, resource)
    }

    pub fn enemy(name: impl Into<String>, health: u32, resource: u32) -> Self {
        Self::new(name, CombatantKind::Enemy, health, resource)
    }

    #[must_use]
    pub fn with_health(mut self, health: Measure) -> Self {
        self.health = health;
        self
    }

    #[must_use]
    pub fn with_resource(mut self, resource: Measure) -> Self {
        self.resource = resource;
        self
    }

    #[must_use]
    pub fn with_speed(mut self, speed: i32) -> Self {
        self.speed = speed;
        self
    }

    #[must_use]
    pub fn with_rating(mut self, damage_type: DamageType, rating: CombatRating) -> Self {
        self.ratings.set(damage_type, rating);
        self
    }

    #[must_use]
    pub fn with_ratings(mut self, ratings: RatingTable) -> Self {
        self.ratings = ratings;
        self
    }

    #[must_use]
    pub fn with_technique(mut self, technique: Technique) -> Self {
        self.techniques.push(technique);
        self
    }

    #[must_use]
    pub fn with_techniques(mut self, techniques: impl IntoIterator<Item = Technique>) -> Self {
        self.techniques.extend(techniques);
        self
    }

    // ===== queries =====

    /// Stable handle assigned when the combatant joins a battle.
    #[inline]
    pub fn id(&self) -> CombatantId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn kind(&self) -> CombatantKind {
        self.kind
    }

    #[inline]
    pub fn health(&self) -> Measure {
        self.health
    }

    #[inline]
    pub fn resource(&self) -> Measure {
        self.resource
    }

    #[inline]
    pub fn speed(&self) -> i32 {
        self.speed
    }

    pub fn ratings(&self) -> &RatingTable {
        &self.ratings
    }

    #[inline]
    pub fn rating(&self, damage_type: DamageType) -> CombatRating {
        self.ratings.get(damage_type)
    }

    pub fn techniques(&self) -> &[Technique] {
        &self.techniques
    }

    #[inline]
    pub fn critical_damage_modifier(&self) -> f32 {
        self.critical_damage_modifier
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        !self.health.is_empty()
    }

    pub fn can_afford(&self, technique: &Technique) -> bool {
        technique.resource_cost() <= self.resource.current()
    }

    // ===== mutation =====

    /// Sets the multiplier applied to this combatant's next damaging action.
    ///
    /// Negative and non-finite inputs are treated as zero.
    pub fn set_critical_damage_modifier(&mut self, modifier: f32) {
        self.critical_damage_modifier = if modifier.is_finite() {
            modifier.max(0.0)
        } else {
            0.0
        };
    }

    /// Reduces health by `amount`, floored at zero.
    ///
    /// Returns the damage actually applied.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        self.health.decrease(amount)
    }

    /// Raises health by `amount`, clamped at maximum.
    ///
    /// Healing a defeated combatant is allowed; any positive result revives it.
    pub fn heal(&mut self, amount: u32) -> u32 {
        self.health.increase(amount)
    }

    /// Raises the resource measure, clamped at maximum.
    pub fn restore_resource(&mut self, amount: u32) -> u32 {
        self.resource.increase(amount)
    }

    /// Debits `cost` from the resource measure.
    pub fn spend_resource(&mut self, cost: u32) -> Result<(), EntityError> {
        if cost > self.resource.current() {
            return Err(EntityError::InsufficientResource {
                name: self.name.clone(),
                cost,
                available: self.resource.current(),
            });
        }
        self.resource.decrease(cost);
        Ok(())
    }
}

impl fmt::Display for CombatEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (HP {}, RP {})", self.name, self.health, self.resource)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damage_is_capped_at_current_health() {
        let mut hero = CombatEntity::player("Hero", 10, 0);

        assert_eq!(hero.take_damage(4), 4);
        assert_eq!(hero.take_damage(50), 6);
        assert_eq!(hero.health().current(), 0);
        assert!(!hero.is_alive());
    }

    #[test]
    fn healing_is_clamped_and_revives() {
        let mut hero = CombatEntity::player("Hero", 10, 0);
        hero.take_damage(10);
        assert!(!hero.is_alive());

        assert_eq!(hero.heal(25), 10);
        assert!(hero.is_alive());
        assert!(hero.health().is_full());
    }

    #[test]
    fn health_stays_within_bounds_under_mixed_operations() {
        let mut slime = CombatEntity::enemy("Slime", 30, 0);
        for (damage, heal) in [(7, 3), (40, 2), (0, 100), (29, 1), (31, 0)] {
            slime.take_damage(damage);
            assert!(slime.health().current() <= slime.health().maximum());
            slime.heal(heal);
            assert!(slime.health().current() <= slime.health().maximum());
        }
    }

    #[test]
    fn spending_more_than_available_is_rejected() {
        let mut mage = CombatEntity::player("Mage", 10, 4);

        assert!(mage.spend_resource(3).is_ok());
        assert_eq!(mage.resource().current(), 1);

        let err = mage.spend_resource(2).unwrap_err();
        assert_eq!(err.severity(), ErrorSeverity::Fatal);
        assert_eq!(mage.resource().current(), 1);
    }

    #[test]
    fn negative_modifier_is_clamped_to_zero() {
        let mut hero = CombatEntity::player("Hero", 10, 0);
        hero.set_critical_damage_modifier(-2.0);
        assert_eq!(hero.critical_damage_modifier(), 0.0);
        hero.set_critical_damage_modifier(f32::NAN);
        assert_eq!(hero.critical_damage_modifier(), 0.0);
    }
}
