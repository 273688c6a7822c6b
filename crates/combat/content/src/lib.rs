//! Data-driven combat content and loaders.
//!
//! This crate reads battle data from files:
//! - Engine configuration (TOML)
//! - Technique catalogs (RON)
//! - Combatant templates, the starting party and enemy encounters (RON)
//!
//! Loaded content feeds `combat-core` directly; encounters are served through
//! the [`combat_core::RosterOracle`] trait.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    CombatantTemplate, ConfigLoader, ContentFactory, LoadResult, RosterCatalog, RosterLoader,
    TechniqueCatalog, TechniqueLoader,
};
