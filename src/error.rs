// src/error.rs
//! Error type for the liveness analysis core.
//!
//! Every variant here represents a programming error, not a runtime
//! condition tied to user input: the analysis has no I/O and nothing to
//! retry. The propagation policy is fail-fast via `Result`; the caller (the
//! compilation driver embedding this crate) is responsible for containment.

use thiserror::Error;

/// Errors produced by the liveness store and the fixpoint engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LivenessError {
    /// A query or internal lookup referenced a label not present in the
    /// result. Indicates a CFG/result mismatch (e.g. querying a label that
    /// was unreachable and therefore never analyzed).
    #[error("unknown block label: {label}")]
    UnknownLabel {
        /// The stringified label, for diagnostics.
        label: String,
    },

    /// Duplicate labels were supplied at store initialization, or a
    /// successor label has no corresponding entry. Indicates a broken CFG
    /// adapter: `postorder()` and `successors()` disagree about which
    /// labels exist.
    #[error("invariant violation: {reason}")]
    InvariantViolation {
        /// Human-readable description of which invariant was broken.
        reason: String,
    },

    /// An adapter's own `uses`/`defines` implementation detected that it
    /// returned data inconsistent with its declared variable set. The core
    /// never raises this itself; it exists so adapters can surface their
    /// own contract violations through this error type instead of
    /// panicking.
    #[error("interface contract violation: {reason}")]
    InterfaceContract {
        /// Human-readable description of the violated contract.
        reason: String,
    },
}

impl LivenessError {
    /// Builds an [`LivenessError::UnknownLabel`] from any label with a
    /// `Debug` implementation.
    pub fn unknown_label<L: std::fmt::Debug>(label: &L) -> Self {
        Self::UnknownLabel {
            label: format!("{label:?}"),
        }
    }

    /// Builds an [`LivenessError::InvariantViolation`] from a message.
    pub fn invariant_violation(reason: impl Into<String>) -> Self {
        Self::InvariantViolation {
            reason: reason.into(),
        }
    }

    /// Builds an [`LivenessError::InterfaceContract`] from a message.
    pub fn interface_contract(reason: impl Into<String>) -> Self {
        Self::InterfaceContract {
            reason: reason.into(),
        }
    }
}
