//! Combat actions: one source, one target, an optional technique.
//!
//! A [`CombatAction`] is built fresh for every move, executed once against
//! the [`Roster`] and dropped. It refers to combatants through
//! [`CombatantId`] so execution never holds two mutable borrows into the
//! same party (self-targeted heals included).
//!
//! Execution pipeline: `pre_validate` (source alive, combatants present,
//! cost affordable) → pay cost → apply effect.

mod damage;
mod error;

pub use damage::calculate_damage;
pub use error::ActionError;

use crate::config::DamageRules;
use crate::state::{CombatEntity, CombatantId, DamageType, EntityError, Roster};
use crate::technique::Technique;

/// What an executed action did to its target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    Damage(DamageType),
    Heal,
    Restore,
}

/// Result of a resolved action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionOutcome {
    pub source: CombatantId,
    pub target: CombatantId,
    pub effect: Effect,
    /// Damage dealt, health healed or resource restored.
    pub amount: u32,
    /// True when the target is down after the action.
    pub target_died: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CombatAction {
    pub source: CombatantId,
    pub target: CombatantId,
    pub technique: Option<Technique>,
}

impl CombatAction {
    /// Plain physical attack.
    pub fn attack(source: CombatantId, target: CombatantId) -> Self {
        Self {
            source,
            target,
            technique: None,
        }
    }

    pub fn technique(source: CombatantId, target: CombatantId, technique: Technique) -> Self {
        Self {
            source,
            target,
            technique: Some(technique),
        }
    }

    /// Damage type used when this action deals damage.
    pub fn damage_type(&self) -> Option<DamageType> {
        match &self.technique {
            None => Some(DamageType::Physical),
            Some(technique) => technique.damage_type(),
        }
    }

    /// Validates pre-conditions using the roster **before** mutation.
    pub fn pre_validate(&self, roster: &Roster) -> Result<(), ActionError> {
        let source = roster
            .get(self.source)
            .ok_or(ActionError::SourceNotFound(self.source))?;
        roster
            .get(self.target)
            .ok_or(ActionError::TargetNotFound(self.target))?;

        if !source.is_alive() {
            return Err(ActionError::SourceDefeated(self.source));
        }
        if let Some(technique) = &self.technique
            && !source.can_afford(technique)
        {
            return Err(ActionError::InsufficientResource(
                EntityError::InsufficientResource {
                    name: source.name().to_owned(),
                    cost: technique.resource_cost(),
                    available: source.resource().current(),
                },
            ));
        }
        Ok(())
    }

    /// Executes the action, paying its cost and applying its effect.
    ///
    /// Damage uses the source's current critical damage modifier, so callers
    /// set it immediately before executing.
    pub fn execute(
        &self,
        roster: &mut Roster,
        rules: &DamageRules,
    ) -> Result<ActionOutcome, ActionError> {
        self.pre_validate(roster)?;

        if let Some(technique) = &self.technique {
            roster
                .get_mut(self.source)
                .ok_or(ActionError::SourceNotFound(self.source))?
                .spend_resource(technique.resource_cost())?;
        }

        let (effect, amount) = match &self.technique {
            None => {
                let amount = self.apply_damage(roster, DamageType::Physical, 0, rules)?;
                (Effect::Damage(DamageType::Physical), amount)
            }
            Some(Technique::Damage {
                power, damage_type, ..
            }) => {
                let amount = self.apply_damage(roster, *damage_type, *power, rules)?;
                (Effect::Damage(*damage_type), amount)
            }
            Some(Technique::Heal { power, .. }) => {
                (Effect::Heal, self.target_mut(roster)?.heal(*power))
            }
            Some(Technique::Support { power, .. }) => (
                Effect::Restore,
                self.target_mut(roster)?.restore_resource(*power),
            ),
        };

        let target_died = !self.target_mut(roster)?.is_alive();
        tracing::debug!(
            source = %self.source,
            target = %self.target,
            ?effect,
            amount,
            target_died,
            "action resolved"
        );

        Ok(ActionOutcome {
            source: self.source,
            target: self.target,
            effect,
            amount,
            target_died,
        })
    }

    fn apply_damage(
        &self,
        roster: &mut Roster,
        damage_type: DamageType,
        power: u32,
        rules: &DamageRules,
    ) -> Result<u32, ActionError> {
        let source = roster
            .get(self.source)
            .ok_or(ActionError::SourceNotFound(self.source))?;
        let target = roster
            .get(self.target)
            .ok_or(ActionError::TargetNotFound(self.target))?;
        let damage = calculate_damage(source, target, damage_type, power, rules);

        Ok(self.target_mut(roster)?.take_damage(damage))
    }

    fn target_mut<'r>(
        &self,
        roster: &'r mut Roster,
    ) -> Result<&'r mut CombatEntity, ActionError> {
        roster
            .get_mut(self.target)
            .ok_or(ActionError::TargetNotFound(self.target))
    }
}
