//! Errors raised while building a scanner or resolving a selector.

use thiserror::Error;

use crate::rules::RuleKind;

/// Configuration failures of the selector engine.
///
/// Malformed selector text is never an error: unrecognised characters are
/// skipped by the tokenizer. Every variant here means the macro table, the
/// rule table, or the finder/matcher tables are inconsistent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    /// A `#{name}` reference names no macro.
    #[error("undefined macro '{name}'")]
    UndefinedMacro {
        /// The referenced name.
        name: String,
    },

    /// The macro reference graph loops back through `name`.
    #[error("macro '{name}' is defined in terms of itself")]
    CyclicMacro {
        /// A macro on the cycle.
        name: String,
    },

    /// A rule's expanded pattern was rejected by the regex engine.
    #[error("rule '{kind}' expands to an invalid pattern: {message}")]
    InvalidRule {
        /// The offending rule.
        kind: RuleKind,
        /// The regex engine's description of the problem.
        message: String,
    },

    /// The joined alternation was rejected even though each rule compiled
    /// on its own (for instance it exceeds the engine's size limit).
    #[error("scanner pattern rejected: {0}")]
    InvalidScanner(String),

    /// No finder is registered for the key selector's rule kind.
    #[error("Invalid finder: {0}")]
    InvalidFinder(RuleKind),

    /// No matcher is registered for an ancestor token's rule kind.
    #[error("Invalid matcher: {0}")]
    InvalidMatcher(RuleKind),
}
