//! Sieve selector engine.
//!
//! Resolves simple CSS selectors (`#id`, `tag`, `.class`, `tag#id`,
//! `tag.class`) joined by the descendant combinator against a tree.
//!
//! [§ 3 Selector Syntax and Structure](https://www.w3.org/TR/selectors-4/#syntax)
//! "A complex selector is a sequence of one or more compound selectors
//! separated by combinators."
//!
//! Resolution runs in three stages:
//!
//! 1. The [`macros`] table is expanded into the [`rules`], and the rules are
//!    compiled into one [`rules::Scanner`].
//! 2. The [`tokenizer`] splits a selector into classified tokens.
//! 3. The [`searcher`] resolves the right-most token by lookup and filters
//!    the candidates by matching the remaining tokens against ancestors.

/// Errors raised while compiling or resolving selectors.
pub mod error;
/// Per-kind lookup and matching functions.
pub mod finder;
/// Named pattern fragments and their expansion.
pub mod macros;
/// Rule kinds, rule tables and the compiled scanner.
pub mod rules;
/// Right-to-left resolution of a token sequence.
pub mod searcher;
/// Chainable query results over a DOM tree.
pub mod selection;
/// Selector tokenization.
pub mod tokenizer;
/// The tree interface the searcher runs against.
pub mod tree;

pub use error::SelectorError;
pub use macros::MacroTable;
pub use rules::{RuleKind, RuleTable, Scanner, SelectorConfig};
pub use searcher::Searcher;
pub use selection::Selection;
pub use tokenizer::{Token, Tokenizer, normalize, tokenize};
pub use tree::QueryTree;

/// Every element below `root` that matches `selector`.
///
/// Results follow the order of the key selector's lookup, which is tree
/// order for the built-in [`sieve_dom::DomTree`]. A selector with no
/// recognisable tokens matches nothing.
///
/// # Errors
///
/// Returns [`SelectorError::InvalidFinder`] or
/// [`SelectorError::InvalidMatcher`] when the selector contains a token kind
/// that cannot be resolved (a pseudo-class).
pub fn select<T: QueryTree>(
    tree: &T,
    root: T::Node,
    selector: &str,
) -> Result<Vec<T::Node>, SelectorError> {
    Searcher::new(tree, tokenize(selector)?).parse(root)
}

/// Whether `node` itself matches `selector`.
///
/// Ancestors are searched up to the top of the tree.
///
/// # Errors
///
/// Returns [`SelectorError::InvalidMatcher`] when a token that has to be
/// tested cannot be matched.
pub fn matches<T: QueryTree>(
    tree: &T,
    node: T::Node,
    selector: &str,
) -> Result<bool, SelectorError> {
    Searcher::new(tree, tokenize(selector)?).matches_node(node)
}

/// The nearest of `node` and its ancestors that matches `selector`.
///
/// This is the lookup used for event delegation: given the target of an
/// event, find the element a handler was registered for.
///
/// # Errors
///
/// Returns [`SelectorError::InvalidMatcher`] when a token that has to be
/// tested cannot be matched.
pub fn closest<T: QueryTree>(
    tree: &T,
    node: T::Node,
    selector: &str,
) -> Result<Option<T::Node>, SelectorError> {
    let searcher = Searcher::new(tree, tokenize(selector)?);
    let mut current = Some(node);
    while let Some(candidate) = current {
        if searcher.matches_node(candidate)? {
            return Ok(Some(candidate));
        }
        current = tree.parent(candidate);
    }
    Ok(None)
}
