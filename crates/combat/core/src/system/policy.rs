//! Enemy decision policies.
//!
//! A policy looks at the acting enemy, its own party and the opposing party
//! and returns the action that enemy takes this turn. The combat system
//! validates whatever comes back before executing it.

use crate::action::CombatAction;
use crate::state::{CombatEntity, first_living};
use crate::technique::Technique;

/// Decides what an enemy does on its turn.
///
/// `allies` is the acting enemy's own party (the actor included) and
/// `opponents` is the player party. Returning `None` makes the enemy pass.
pub trait EnemyPolicy {
    fn decide(
        &mut self,
        actor: &CombatEntity,
        allies: &[CombatEntity],
        opponents: &[CombatEntity],
    ) -> Option<CombatAction>;
}

impl<F> EnemyPolicy for F
where
    F: FnMut(&CombatEntity, &[CombatEntity], &[CombatEntity]) -> Option<CombatAction>,
{
    fn decide(
        &mut self,
        actor: &CombatEntity,
        allies: &[CombatEntity],
        opponents: &[CombatEntity],
    ) -> Option<CombatAction> {
        self(actor, allies, opponents)
    }
}

/// Plain attack against the first living opponent.
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstLivingTarget;

impl EnemyPolicy for FirstLivingTarget {
    fn decide(
        &mut self,
        actor: &CombatEntity,
        _allies: &[CombatEntity],
        opponents: &[CombatEntity],
    ) -> Option<CombatAction> {
        let target = &opponents[first_living(opponents)?];
        Some(CombatAction::attack(actor.id(), target.id()))
    }
}

/// Picks targets and techniques from a seeded PCG stream.
///
/// The same seed and the same battle always produce the same choices.
/// Affordable techniques compete with the plain attack on equal odds;
/// heal and support techniques go to the most wounded living ally.
#[derive(Clone, Debug)]
pub struct SeededRandomTarget {
    state: u64,
}

impl SeededRandomTarget {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    pub fn new(seed: u64) -> Self {
        Self {
            state: mix_seed(seed),
        }
    }

    /// Next 32-bit output (PCG-XSH-RR).
    fn next_u32(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT);
        let xorshifted = (((self.state >> 18) ^ self.state) >> 27) as u32;
        let rot = (self.state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    fn pick(&mut self, len: usize) -> usize {
        (self.next_u32() as usize) % len
    }
}

impl EnemyPolicy for SeededRandomTarget {
    fn decide(
        &mut self,
        actor: &CombatEntity,
        allies: &[CombatEntity],
        opponents: &[CombatEntity],
    ) -> Option<CombatAction> {
        let living: Vec<&CombatEntity> = opponents.iter().filter(|e| e.is_alive()).collect();
        if living.is_empty() {
            return None;
        }

        let affordable: Vec<&Technique> = actor
            .techniques()
            .iter()
            .filter(|t| actor.can_afford(t))
            .collect();
        let choice = self.pick(affordable.len() + 1);

        let Some(technique) = affordable.get(choice).copied() else {
            let target = living[self.pick(living.len())];
            return Some(CombatAction::attack(actor.id(), target.id()));
        };

        let target = if technique.targets_allies() {
            most_wounded(allies).unwrap_or(actor)
        } else {
            living[self.pick(living.len())]
        };
        Some(CombatAction::technique(
            actor.id(),
            target.id(),
            technique.clone(),
        ))
    }
}

/// Living member with the lowest health ratio, first one on ties.
fn most_wounded(members: &[CombatEntity]) -> Option<&CombatEntity> {
    members
        .iter()
        .filter(|e| e.is_alive())
        .min_by(|a, b| a.health().ratio().total_cmp(&b.health().ratio()))
}

/// Spreads low-entropy seeds (0, 1, 2...) across the state space.
fn mix_seed(seed: u64) -> u64 {
    let mut hash = seed ^ 0x9e3779b97f4a7c15;
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;
    hash
}
