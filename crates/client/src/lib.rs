//! Terminal front end for `combat-core`.
//!
//! The client loads content through `combat-content`, hands both parties to
//! a [`combat_core::CombatSystem`] and drives it from line-based input. Each
//! input line becomes one state-machine call; every call is followed by a
//! freshly rendered frame.

pub mod app;
pub mod config;
pub mod input;
pub mod render;
pub mod setup;

pub use app::SkirmishApp;
pub use config::SkirmishConfig;
pub use input::{Command, InputError};
pub use setup::BattleSetup;
