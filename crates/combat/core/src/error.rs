//! Common error infrastructure for combat-core.
//!
//! Domain-specific errors (e.g. `PatternError`, `ActionError`) are defined in
//! their respective modules alongside the operations they guard. This module
//! holds the shared severity classification and the [`EngineError`] trait.
//!
//! Three kinds of failure exist in the engine:
//!
//! - **Configuration errors** (empty parties at engage, malformed meter layouts)
//!   are reported at construction time as `Validation`.
//! - **Invariant violations** (unaffordable technique, out-of-range index) are
//!   caller bugs and are reported as `Internal` or `Fatal`.
//! - **Game-flow conditions** (a target dies, a party falls, the meter runs out
//!   of patterns) are ordinary control flow and never produce errors.

use crate::state::CombatantId;

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - can retry with same or alternative input.
    Recoverable,

    /// Validation error - invalid input or configuration, should not retry without changes.
    ///
    /// Examples: empty enemy party, meter layout without slices
    Validation,

    /// Internal error - the caller broke an engine invariant.
    ///
    /// Examples: player index out of range, enemy policy targeting a dead combatant
    Internal,

    /// Fatal error - battle state can no longer be trusted.
    ///
    /// Examples: technique executed without enough resource
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates a caller bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Contextual information attached to errors for debugging and diagnostics.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// Combatant that triggered the error (if applicable).
    pub combatant: Option<CombatantId>,

    /// Battle round at the time of error.
    pub round: u32,

    /// Optional static message providing additional context.
    pub message: Option<&'static str>,
}

impl ErrorContext {
    /// Creates a new error context for the given round.
    #[must_use]
    pub const fn new(round: u32) -> Self {
        Self {
            combatant: None,
            round,
            message: None,
        }
    }

    /// Attaches a combatant to this context (builder pattern).
    #[must_use]
    pub const fn with_combatant(mut self, combatant: CombatantId) -> Self {
        self.combatant = Some(combatant);
        self
    }

    /// Attaches a static message to this context (builder pattern).
    #[must_use]
    pub const fn with_message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }
}

/// Common trait for all combat-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait EngineError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns the context information for this error, if available.
    fn context(&self) -> Option<&ErrorContext> {
        None
    }

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
