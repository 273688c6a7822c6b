//! Combatant data model.
//!
//! - [`Measure`]: clamped current/maximum quantity (health, resource)
//! - [`CombatRating`] / [`RatingTable`]: attack/defense per [`DamageType`]
//! - [`CombatEntity`]: a player or enemy participant
//! - [`Party`] / [`Roster`]: ordered sides addressed through [`CombatantId`]

mod entity;
mod measure;
mod party;
mod rating;

pub use entity::{CombatEntity, CombatantKind, EntityError};
pub use measure::Measure;
pub use party::{
    CombatantId, Party, Roster, Side, clamp_index, first_living, next_living_after,
};
pub use rating::{CombatRating, DamageType, RatingTable};
