//! Error kinds raised by automaton operations.
//!
//! Every failure is local and deterministic: it is triggered by the caller
//! (a letter outside the declared alphabet, a non-Boolean machine passed to a
//! Boolean combinator, a corrupted encoding, ...) and is never recovered from
//! inside the crate.

use thiserror::Error;

/// Result type alias for automaton operations.
pub type Result<T, E = DfaError> = std::result::Result<T, E>;

/// Errors that can occur while running, combining or encoding automata.
///
/// Letters and alphabets are carried in their `Debug` rendering, so the error
/// type does not depend on the letter types of the automaton that raised it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DfaError {
    /// A letter was fed to an automaton whose input alphabet does not contain it.
    #[error("letter {letter} is not in the input alphabet {alphabet}")]
    AlphabetViolation { letter: String, alphabet: String },

    /// A state produced a label outside of the declared output alphabet.
    #[error("label {label} is not in the output alphabet {alphabet}")]
    OutputViolation { label: String, alphabet: String },

    /// Reachable states were requested over an infinite input alphabet.
    #[error("cannot enumerate states over the universal input alphabet")]
    UnboundedStates,

    /// Two automata cannot be wired together because their alphabets disagree.
    #[error("incompatible alphabets: {left} vs {right}")]
    IncompatibleAlphabet { left: String, right: String },

    /// A Boolean operation was applied to a machine with non-Boolean outputs.
    #[error("operation requires outputs within {{false, true}}, found {outputs}")]
    NonBooleanOperation { outputs: String },

    /// An integer encoding does not describe a well-formed automaton.
    #[error("malformed encoding: {0}")]
    MalformedEncoding(String),

    /// The canonical encoding cannot express an automaton without input letters.
    #[error("cannot encode an automaton over the empty input alphabet")]
    EmptyAlphabet,

    #[error("formatting failed")]
    Format(#[from] std::fmt::Error),
}

impl DfaError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        DfaError::MalformedEncoding(reason.into())
    }
}
