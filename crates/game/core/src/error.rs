//! Common error infrastructure for waltz-core.
//!
//! Rule failures inside a battle are never fatal: the pipelines return typed
//! errors, and the round controller turns them into warning log entries plus a
//! basic-attack fallback. Domain-specific errors (`CastError`, `RosterError`)
//! live next to the operations that produce them and implement [`GameError`]
//! so callers can classify them uniformly.

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// The turn can continue with an alternative action.
    ///
    /// Examples: not enough EP, silenced caster
    Recoverable,

    /// Invalid input that should be rejected without retry.
    ///
    /// Examples: illegal target, unknown target class
    Validation,

    /// Setup data is inconsistent and the battle cannot start.
    ///
    /// Examples: squad too large, empty squad
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }
}

/// Common trait for all waltz-core errors.
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
