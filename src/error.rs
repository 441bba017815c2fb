//! Construction-time error types.
//!
//! Only grammar *construction* can fail: referencing an undeclared name,
//! redefining a rule, linking against a missing rule, or executing an
//! unlinked definition. A failure to *match* is not an error — it is the
//! ordinary `None` return of the matching engine and the backbone of
//! backtracking.

use thiserror::Error;

/// Errors raised while building or linking a grammar.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SyntaxError {
    /// A rule name was defined twice in the same definition.
    #[error("duplicate rule definition: {0}")]
    DuplicateRule(String),

    /// A rule reference could not be resolved during the link pass.
    #[error("undefined rule referenced: {0}")]
    UndefinedRule(String),

    /// A keyword token type was looked up that no `keyword` call declared.
    #[error("undefined token type referenced: {0}")]
    UndefinedTokenType(String),

    /// A stateful node referenced a state slot that was never declared.
    #[error("undefined state {kind} referenced: {name}")]
    UndefinedState {
        kind: &'static str,
        name: String,
    },

    /// A state slot name was declared twice.
    #[error("duplicate state {kind} declaration: {name}")]
    DuplicateState {
        kind: &'static str,
        name: String,
    },

    /// A match entry point was called before `link()` completed.
    #[error("definition is not linked; call link() before matching")]
    NotLinked,

    /// A match entry point was called on a definition without an entry rule.
    #[error("definition has no entry rule")]
    MissingEntry,

    /// A sub-grammar passed to `invoke` is unusable (unlinked or lacking an
    /// entry rule).
    #[error("invoked definition {0} is not ready: {1}")]
    InvalidInvoke(String, &'static str),

    /// A pattern handed to the regexp compiler is not well-formed.
    #[error("malformed pattern at offset {offset}: {reason}")]
    InvalidPattern {
        offset: usize,
        reason: String,
    },
}

impl SyntaxError {
    /// Create an undefined-state error for a flag slot.
    pub(crate) fn no_flag(name: &str) -> Self {
        Self::UndefinedState { kind: "flag", name: name.to_string() }
    }

    /// Create an undefined-state error for a char slot.
    pub(crate) fn no_char(name: &str) -> Self {
        Self::UndefinedState { kind: "char", name: name.to_string() }
    }

    /// Create an undefined-state error for a string slot.
    pub(crate) fn no_string(name: &str) -> Self {
        Self::UndefinedState { kind: "string", name: name.to_string() }
    }
}
