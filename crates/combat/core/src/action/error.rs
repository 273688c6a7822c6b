//! Action execution errors.

use crate::error::{EngineError, ErrorSeverity};
use crate::state::{CombatantId, EntityError};

/// Errors that can occur while executing a [`CombatAction`](super::CombatAction).
///
/// None of these are reachable through a correctly guarded input layer.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    /// Source combatant is not part of the roster.
    #[error("source {0} not found")]
    SourceNotFound(CombatantId),

    /// Target combatant is not part of the roster.
    #[error("target {0} not found")]
    TargetNotFound(CombatantId),

    /// Source is down and cannot act.
    #[error("source {0} is defeated")]
    SourceDefeated(CombatantId),

    /// Caster cannot pay for the selected technique.
    #[error(transparent)]
    InsufficientResource(#[from] EntityError),
}

impl EngineError for ActionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::SourceNotFound(_) | Self::TargetNotFound(_) | Self::SourceDefeated(_) => {
                ErrorSeverity::Internal
            }
            Self::InsufficientResource(err) => err.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::SourceNotFound(_) => "ACTION_SOURCE_NOT_FOUND",
            Self::TargetNotFound(_) => "ACTION_TARGET_NOT_FOUND",
            Self::SourceDefeated(_) => "ACTION_SOURCE_DEFEATED",
            Self::InsufficientResource(_) => "ACTION_INSUFFICIENT_RESOURCE",
        }
    }
}
