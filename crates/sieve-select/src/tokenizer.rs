//! Selector tokenizer.
//!
//! Splits a selector string into classified [`Token`]s by running the
//! [`Scanner`] over the normalized input. Whitespace between tokens is the
//! descendant combinator, so token order is the ancestor chain, outermost
//! first.
//!
//! Tokenizing is lenient: text the scanner does not recognise (`>`, `[`,
//! stray punctuation) is skipped rather than rejected. The skipped fragments
//! are kept for callers that want to report them.

use std::fmt;

use crate::error::SelectorError;
use crate::rules::{RuleKind, Scanner};

/// A classified selector fragment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    /// The matched text, e.g. `div.item`.
    pub identity: String,
    /// The rule that matched it.
    pub finder: RuleKind,
}

impl Token {
    /// Create a token.
    #[must_use]
    pub fn new(identity: impl Into<String>, finder: RuleKind) -> Self {
        Self {
            identity: identity.into(),
            finder,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "identity: {}, finder: {}", self.identity, self.finder)
    }
}

/// Trim Unicode whitespace (including no-break space) from both ends, then
/// collapse every inner run of space, tab, CR, LF or form feed to a single
/// space.
#[must_use]
pub fn normalize(selector: &str) -> String {
    selector
        .trim()
        .split_ascii_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Tokenizer over one selector string.
pub struct Tokenizer<'s> {
    /// The compiled rules
    scanner: &'s Scanner,
    /// The normalized selector
    input: String,
    /// Collected tokens
    tokens: Vec<Token>,
    /// Unrecognised, non-blank text between tokens
    skipped: Vec<String>,
}

impl<'s> Tokenizer<'s> {
    /// Create a tokenizer for `selector`, normalizing it first.
    #[must_use]
    pub fn new(scanner: &'s Scanner, selector: &str) -> Self {
        Self {
            scanner,
            input: normalize(selector),
            tokens: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Scan the whole input, classifying each match.
    ///
    /// Matching restarts after the end of the previous match until the
    /// scanner finds nothing more.
    pub fn run(&mut self) {
        let mut last_end = 0;
        for captures in self.scanner.regex().captures_iter(&self.input) {
            let Some(whole) = captures.get(0) else {
                continue;
            };
            record_gap(&mut self.skipped, &self.input[last_end..whole.start()]);
            last_end = whole.end();

            if let Some(kind) = self.scanner.classify(&captures) {
                self.tokens.push(Token::new(whole.as_str(), kind));
            }
        }
        record_gap(&mut self.skipped, &self.input[last_end..]);
    }

    /// The normalized selector.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Return a reference to the collected tokens.
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Return the collected tokens.
    #[must_use]
    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    /// The rule kind of each token, in token order.
    #[must_use]
    pub fn finders(&self) -> Vec<RuleKind> {
        self.tokens.iter().map(|token| token.finder).collect()
    }

    /// Text that was dropped because no rule matched it.
    #[must_use]
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }
}

fn record_gap(skipped: &mut Vec<String>, gap: &str) {
    let gap = gap.trim();
    if !gap.is_empty() {
        skipped.push(gap.to_string());
    }
}

/// Tokenize `selector` with the standard scanner.
///
/// # Errors
///
/// Fails only if the standard scanner cannot be compiled.
pub fn tokenize(selector: &str) -> Result<Vec<Token>, SelectorError> {
    let mut tokenizer = Tokenizer::new(Scanner::standard()?, selector);
    tokenizer.run();
    Ok(tokenizer.into_tokens())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_and_trims() {
        assert_eq!(normalize("  div \t\n .item\x0c p  "), "div .item p");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" \t "), "");
    }

    #[test]
    fn test_normalize_trims_unicode_spaces_at_the_ends() {
        assert_eq!(normalize("\u{a0}p"), "p");
        assert_eq!(normalize("\u{2003} ul \u{a0}"), "ul");
        // Inside the selector a no-break space is identifier text
        assert_eq!(normalize("a\u{a0}b"), "a\u{a0}b");
    }

    #[test]
    fn test_token_display() {
        let token = Token::new("div.item", RuleKind::NameAndClass);
        assert_eq!(token.to_string(), "identity: div.item, finder: name and class");
    }

    #[test]
    fn test_skipped_fragments_are_recorded() {
        let mut tokenizer = Tokenizer::new(Scanner::standard().unwrap(), "ul > li + [x] a");
        tokenizer.run();
        assert_eq!(tokenizer.input(), "ul > li + [x] a");
        assert_eq!(
            tokenizer.finders(),
            vec![
                RuleKind::Element,
                RuleKind::Element,
                RuleKind::Element,
                RuleKind::Element
            ]
        );
        assert_eq!(tokenizer.skipped(), &[">", "+ [", "]"]);
    }
}
