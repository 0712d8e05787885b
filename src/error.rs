//! Typed errors for the learner core.

use thiserror::Error;

/// Which rule family an induction attempt belonged to, for diagnostics only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleFamily {
    /// The exact mapping store.
    Mapping,
    /// Per-character abstraction rules.
    CharGeneric,
    /// Per-character abstraction rules generalized over identifier-group length.
    CharGenericSize,
    /// Per-token abstraction rules.
    WordGeneric,
    /// Arithmetic rules.
    Math,
}

impl std::fmt::Display for RuleFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Mapping => "mapping",
            Self::CharGeneric => "char-generic",
            Self::CharGenericSize => "char-generic-size",
            Self::WordGeneric => "word-generic",
            Self::Math => "math",
        };
        f.write_str(name)
    }
}

/// An error surfaced by the learner core.
///
/// Most of the recoverable conditions described by the specification (a contradicted rule,
/// a division by zero, a full task reset) are *not* modeled here — they are absorbed as
/// ordinary control flow inside [`crate::brain`]. Only conditions that the caller must act on
/// (by terminating the session) are typed errors.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BrainError {
    /// The teacher violated the tick protocol: a reward arrived with no prior input, the
    /// reward and input streams drifted out of alignment, or syntax discovery was attempted
    /// with fewer than four recorded rewards. This is fatal: the caller should terminate the
    /// session rather than continue operating on an incoherent stream.
    #[error("teacher protocol violation: {detail}")]
    ProtocolViolation {
        /// A short human-readable description of what was inconsistent.
        detail: String,
    },
}
