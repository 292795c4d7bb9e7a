//! Right-to-left selector resolution.
//!
//! [§ 16.1 Descendant combinator](https://www.w3.org/TR/selectors-4/#descendant-combinators)
//! "A selector of the form 'A B' represents an element B that is an
//! arbitrary descendant of some ancestor element A."
//!
//! The right-most token (the *key selector*) is resolved by direct lookup.
//! Each candidate is then kept only if the remaining tokens can be matched,
//! innermost first, against its chain of strict ancestors.

use crate::error::SelectorError;
use crate::finder::{find, matches_token};
use crate::tokenizer::Token;
use crate::tree::QueryTree;

/// Resolves one token sequence against a tree.
pub struct Searcher<'t, T: QueryTree> {
    tree: &'t T,
    /// The right-most token, `None` for an empty selector
    key_selector: Option<Token>,
    /// The remaining tokens, outermost first
    tokens: Vec<Token>,
}

impl<'t, T: QueryTree> Searcher<'t, T> {
    /// Take ownership of `tokens`, splitting off the last one as the key
    /// selector.
    #[must_use]
    pub fn new(tree: &'t T, mut tokens: Vec<Token>) -> Self {
        let key_selector = tokens.pop();
        Self {
            tree,
            key_selector,
            tokens,
        }
    }

    /// The right-most token.
    #[must_use]
    pub const fn key_selector(&self) -> Option<&Token> {
        self.key_selector.as_ref()
    }

    /// The ancestor tokens, outermost first.
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Every node below `root` the selector matches, in the order the key
    /// selector's lookup returned them.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError::InvalidFinder`] if the key selector has no
    /// finder and [`SelectorError::InvalidMatcher`] if a token that has to be
    /// tested has no matcher.
    pub fn parse(&self, root: T::Node) -> Result<Vec<T::Node>, SelectorError> {
        let Some(key) = &self.key_selector else {
            return Ok(Vec::new());
        };

        let mut results = Vec::new();
        for candidate in find(self.tree, root, key)? {
            let qualifies = if self.tokens.is_empty() {
                // The finder over-approximates; re-check the key itself
                matches_token(self.tree, candidate, key)?
            } else {
                self.ancestors_match(candidate)?
            };
            if qualifies {
                results.push(candidate);
            }
        }
        Ok(results)
    }

    /// Whether `node` satisfies the whole selector: the key selector matches
    /// it and the remaining tokens match its ancestors.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError::InvalidMatcher`] if a token that has to be
    /// tested has no matcher.
    pub fn matches_node(&self, node: T::Node) -> Result<bool, SelectorError> {
        let Some(key) = &self.key_selector else {
            return Ok(false);
        };
        if !matches_token(self.tree, node, key)? {
            return Ok(false);
        }
        self.ancestors_match(node)
    }

    /// Whether the remaining tokens match `element` or its ancestors.
    ///
    /// Walks upward from `element`. The innermost unmatched token is tested
    /// at each node; on a match the next token to the left becomes current
    /// and the walk continues from that node's parent. Ancestors need not be
    /// adjacent. Succeeds once every token has matched and fails when the
    /// walk runs off the top of the tree first. With no remaining tokens it
    /// trivially succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError::InvalidMatcher`] for a token without a matcher.
    pub fn matches_all_rules(&self, element: T::Node) -> Result<bool, SelectorError> {
        let mut pending = self.tokens.iter().rev().peekable();
        let mut current = Some(element);

        while let Some(&token) = pending.peek() {
            let Some(node) = current else {
                return Ok(false);
            };
            if matches_token(self.tree, node, token)? {
                let _ = pending.next();
            }
            current = self.tree.parent(node);
        }
        Ok(true)
    }

    fn ancestors_match(&self, candidate: T::Node) -> Result<bool, SelectorError> {
        if self.tokens.is_empty() {
            return Ok(true);
        }
        match self.tree.parent(candidate) {
            Some(parent) => self.matches_all_rules(parent),
            None => Ok(false),
        }
    }
}
