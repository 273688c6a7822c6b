//! Deterministic turn-based combat rules.
//!
//! `combat-core` defines combatants, techniques, the power-meter timing
//! check and the [`system::CombatSystem`] state machine that runs a battle
//! from the opening line to victory or defeat. Presentation and content
//! loading live in other crates and depend on the types re-exported here.
pub mod action;
pub mod config;
pub mod error;
pub mod meter;
pub mod roster;
pub mod state;
pub mod system;
pub mod technique;

pub use action::{ActionError, ActionOutcome, CombatAction, Effect, calculate_damage};
pub use config::{BattleText, CombatConfig, DamageRules, MeterRules, PatternSpec};
pub use error::{EngineError, ErrorContext, ErrorSeverity};
pub use meter::{MeterError, MeterResult, PatternError, PowerMeter, PowerMeterPattern, Slice};
pub use roster::{RosterOracle, StaticRoster};
pub use state::{
    CombatEntity, CombatRating, CombatantId, CombatantKind, DamageType, EntityError, Measure,
    Party, RatingTable, Roster, Side,
};
pub use system::{
    BattleCallbacks, BattleLog, BattleOutcome, CombatError, CombatSystem, CombatSystemState,
    CombatView, EnemyPolicy, EngageError, FirstLivingTarget, SeededRandomTarget, SystemError,
};
pub use technique::{Technique, TechniqueKind};
