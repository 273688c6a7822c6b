//! Combat system errors.
//!
//! Engage errors are caller mistakes and are reported as `Validation`.
//! Everything returned from an input handler means the controller's own
//! bookkeeping, or an enemy policy, broke an invariant.

use crate::action::ActionError;
use crate::error::{EngineError, ErrorContext, ErrorSeverity};
use crate::state::{CombatantId, CombatantKind, Side};

/// Reasons a battle cannot start.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngageError {
    #[error("a battle is already in progress")]
    AlreadyEngaged,

    #[error("cannot engage an empty enemy party")]
    NoEnemies,

    #[error("cannot engage with an empty player party")]
    NoPlayers,

    #[error("{name} ({found}) cannot join the {expected} party")]
    WrongKind {
        name: String,
        expected: CombatantKind,
        found: CombatantKind,
    },
}

impl EngineError for EngageError {
    /// A running battle can be finished and the call retried unchanged.
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::AlreadyEngaged => ErrorSeverity::Recoverable,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::AlreadyEngaged => "ENGAGE_ALREADY_ENGAGED",
            Self::NoEnemies => "ENGAGE_NO_ENEMIES",
            Self::NoPlayers => "ENGAGE_NO_PLAYERS",
            Self::WrongKind { .. } => "ENGAGE_WRONG_KIND",
        }
    }
}

/// Controller invariant violations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SystemError {
    /// `set_current_player` was given an index past the end of the party.
    #[error("player index {index} out of range for party of {len}")]
    PlayerIndexOutOfRange {
        index: usize,
        len: usize,
        context: ErrorContext,
    },

    /// A player command was resolved while no player was selected.
    #[error("no current player")]
    NoCurrentPlayer { context: ErrorContext },

    /// A selection index points past the end of its party.
    #[error("no {side:?} combatant at index {index}")]
    TargetIndexOutOfRange {
        side: Side,
        index: usize,
        context: ErrorContext,
    },

    /// A technique command was resolved without a selected technique.
    #[error("no technique selected")]
    NoTechniqueSelected { context: ErrorContext },

    /// An enemy policy returned an action the acting enemy may not take.
    #[error("enemy policy returned an invalid action for {enemy}: {reason}")]
    InvalidDecision {
        enemy: CombatantId,
        reason: &'static str,
        context: ErrorContext,
    },
}

impl SystemError {
    pub fn player_index_out_of_range(index: usize, len: usize, round: u32) -> Self {
        Self::PlayerIndexOutOfRange {
            index,
            len,
            context: ErrorContext::new(round).with_message("current player index rejected"),
        }
    }

    pub fn no_current_player(round: u32) -> Self {
        Self::NoCurrentPlayer {
            context: ErrorContext::new(round).with_message("player command without a player"),
        }
    }

    pub fn target_index_out_of_range(side: Side, index: usize, round: u32) -> Self {
        Self::TargetIndexOutOfRange {
            side,
            index,
            context: ErrorContext::new(round).with_message("target index not clamped"),
        }
    }

    pub fn no_technique_selected(combatant: CombatantId, round: u32) -> Self {
        Self::NoTechniqueSelected {
            context: ErrorContext::new(round)
                .with_combatant(combatant)
                .with_message("technique command without a technique"),
        }
    }

    pub fn invalid_decision(enemy: CombatantId, reason: &'static str, round: u32) -> Self {
        Self::InvalidDecision {
            enemy,
            reason,
            context: ErrorContext::new(round)
                .with_combatant(enemy)
                .with_message("enemy policy contract violated"),
        }
    }
}

impl EngineError for SystemError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::PlayerIndexOutOfRange { context, .. } => Some(context),
            Self::NoCurrentPlayer { context } => Some(context),
            Self::TargetIndexOutOfRange { context, .. } => Some(context),
            Self::NoTechniqueSelected { context } => Some(context),
            Self::InvalidDecision { context, .. } => Some(context),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::PlayerIndexOutOfRange { .. } => "SYSTEM_PLAYER_INDEX_OUT_OF_RANGE",
            Self::NoCurrentPlayer { .. } => "SYSTEM_NO_CURRENT_PLAYER",
            Self::TargetIndexOutOfRange { .. } => "SYSTEM_TARGET_INDEX_OUT_OF_RANGE",
            Self::NoTechniqueSelected { .. } => "SYSTEM_NO_TECHNIQUE_SELECTED",
            Self::InvalidDecision { .. } => "SYSTEM_INVALID_DECISION",
        }
    }
}

/// Error returned from the combat system's input entry points.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CombatError {
    #[error(transparent)]
    System(#[from] SystemError),

    #[error(transparent)]
    Action(#[from] ActionError),
}

impl EngineError for CombatError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::System(err) => err.severity(),
            Self::Action(err) => err.severity(),
        }
    }

    fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::System(err) => err.context(),
            Self::Action(err) => err.context(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::System(err) => err.error_code(),
            Self::Action(err) => err.error_code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engage_errors_are_validation() {
        let err = EngageError::WrongKind {
            name: "Slime".into(),
            expected: CombatantKind::Player,
            found: CombatantKind::Enemy,
        };
        assert_eq!(err.severity(), ErrorSeverity::Validation);
        assert_eq!(err.to_string(), "Slime (enemy) cannot join the player party");
    }

    #[test]
    fn combat_error_delegates_to_inner() {
        let err = CombatError::from(SystemError::invalid_decision(
            CombatantId::enemy(2),
            "target is not a living player",
            4,
        ));
        assert_eq!(err.severity(), ErrorSeverity::Internal);
        assert_eq!(err.error_code(), "SYSTEM_INVALID_DECISION");

        let context = err.context().unwrap();
        assert_eq!(context.round, 4);
        assert_eq!(context.combatant, Some(CombatantId::enemy(2)));
    }

    #[test]
    fn action_failures_keep_their_severity() {
        let err = CombatError::from(ActionError::TargetNotFound(CombatantId::enemy(0)));
        assert_eq!(err.severity(), ErrorSeverity::Internal);
        assert_eq!(err.error_code(), "ACTION_TARGET_NOT_FOUND");
    }
}
