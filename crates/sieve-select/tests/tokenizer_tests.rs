//! Integration tests for selector tokenization.

use quickcheck_macros::quickcheck;
use sieve_select::{RuleKind, Scanner, Token, Tokenizer, normalize, tokenize};

fn kinds(selector: &str) -> Vec<(String, RuleKind)> {
    tokenize(selector)
        .unwrap()
        .into_iter()
        .map(|token| (token.identity, token.finder))
        .collect()
}

fn pair(identity: &str, kind: RuleKind) -> (String, RuleKind) {
    (identity.to_string(), kind)
}

// ========== Simple selectors ==========

#[test]
fn test_tokenize_id() {
    assert_eq!(kinds("#x"), vec![pair("#x", RuleKind::Id)]);
}

#[test]
fn test_tokenize_element() {
    assert_eq!(kinds("div"), vec![pair("div", RuleKind::Element)]);
}

#[test]
fn test_tokenize_class() {
    assert_eq!(kinds(".item"), vec![pair(".item", RuleKind::Class)]);
}

#[test]
fn test_tokenize_pseudo_class() {
    assert_eq!(
        kinds("a:hover"),
        vec![
            pair("a", RuleKind::Element),
            pair(":hover", RuleKind::PseudoClass)
        ]
    );
}

// ========== Compound rules win over their prefixes ==========

#[test]
fn test_tokenize_name_and_class() {
    assert_eq!(
        kinds("div.item"),
        vec![pair("div.item", RuleKind::NameAndClass)]
    );
}

#[test]
fn test_tokenize_name_and_id() {
    assert_eq!(kinds("ul#menu"), vec![pair("ul#menu", RuleKind::NameAndId)]);
}

#[test]
fn test_tokenize_name_id_and_class() {
    // Only one compound rule applies; the class becomes its own token
    assert_eq!(
        kinds("span#a.b"),
        vec![
            pair("span#a", RuleKind::NameAndId),
            pair(".b", RuleKind::Class)
        ]
    );
}

#[test]
fn test_tokenize_adjacent_ids() {
    assert_eq!(
        kinds("#a#b"),
        vec![pair("#a", RuleKind::Id), pair("#b", RuleKind::Id)]
    );
}

// ========== Descendant chains ==========

#[test]
fn test_tokenize_descendant_chain() {
    assert_eq!(
        kinds("ul li"),
        vec![pair("ul", RuleKind::Element), pair("li", RuleKind::Element)]
    );
    assert_eq!(
        kinds("#nav ul.menu > li a"),
        vec![
            pair("#nav", RuleKind::Id),
            pair("ul.menu", RuleKind::NameAndClass),
            pair("li", RuleKind::Element),
            pair("a", RuleKind::Element)
        ]
    );
}

#[test]
fn test_tokenize_class_after_space_is_separate() {
    assert_eq!(
        kinds("div .item"),
        vec![pair("div", RuleKind::Element), pair(".item", RuleKind::Class)]
    );
}

// ========== Identifier grammar ==========

#[test]
fn test_tokenize_identifier_prefixes() {
    assert_eq!(kinds("-moz-box"), vec![pair("-moz-box", RuleKind::Element)]);
    assert_eq!(kinds("@page"), vec![pair("@page", RuleKind::Element)]);
    assert_eq!(kinds("_private"), vec![pair("_private", RuleKind::Element)]);
}

#[test]
fn test_tokenize_non_ascii_identifier() {
    assert_eq!(kinds(".über"), vec![pair(".über", RuleKind::Class)]);
}

#[test]
fn test_tokenize_escaped_identifier() {
    assert_eq!(kinds(r"#a\:b"), vec![pair(r"#a\:b", RuleKind::Id)]);
}

#[test]
fn test_leading_digit_is_skipped() {
    let mut tokenizer = Tokenizer::new(Scanner::standard().unwrap(), "1abc");
    tokenizer.run();
    assert_eq!(tokenizer.tokens(), &[Token::new("abc", RuleKind::Element)]);
    assert_eq!(tokenizer.skipped(), &["1"]);
}

// ========== Degenerate input ==========

#[test]
fn test_tokenize_empty_and_blank() {
    assert!(tokenize("").unwrap().is_empty());
    assert!(tokenize(" \t\n ").unwrap().is_empty());
}

#[test]
fn test_tokenize_punctuation_only() {
    let mut tokenizer = Tokenizer::new(Scanner::standard().unwrap(), "> + ~ *");
    tokenizer.run();
    assert!(tokenizer.tokens().is_empty());
    assert_eq!(tokenizer.skipped(), &["> + ~ *"]);
}

// ========== Normalization ==========

#[test]
fn test_whitespace_is_normalized_before_scanning() {
    assert_eq!(tokenize("  div   .item  ").unwrap(), tokenize("div .item").unwrap());
    assert_eq!(
        tokenize("ul\n\tli").unwrap(),
        tokenize("ul li").unwrap()
    );
}

#[test]
fn test_tokenizer_exposes_normalized_input() {
    let tokenizer = Tokenizer::new(Scanner::standard().unwrap(), "\tul   li\n");
    assert_eq!(tokenizer.input(), "ul li");
    assert!(tokenizer.tokens().is_empty());
}

#[quickcheck]
fn prop_normalize_is_idempotent(input: String) -> bool {
    let once = normalize(&input);
    normalize(&once) == once
}

#[quickcheck]
fn prop_tokenize_is_deterministic(input: String) -> bool {
    tokenize(&input).unwrap() == tokenize(&input).unwrap()
}

#[quickcheck]
fn prop_tokenize_ignores_whitespace_layout(input: String) -> bool {
    tokenize(&input).unwrap() == tokenize(&normalize(&input)).unwrap()
}

#[quickcheck]
fn prop_identities_come_from_the_input(input: String) -> bool {
    let normalized = normalize(&input);
    tokenize(&input)
        .unwrap()
        .iter()
        .all(|token| !token.identity.is_empty() && normalized.contains(&token.identity))
}
