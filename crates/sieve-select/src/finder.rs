//! Finder and matcher tables.
//!
//! A *finder* turns a token into candidate nodes by direct lookup below a
//! root. A *matcher* tests one node against a token. Both are registered per
//! [`RuleKind`]; `pseudo class` has neither, so dispatching on it fails with
//! [`SelectorError::InvalidFinder`] / [`SelectorError::InvalidMatcher`].

use crate::error::SelectorError;
use crate::rules::RuleKind;
use crate::tokenizer::Token;
use crate::tree::QueryTree;

/// Direct lookup below a root for one rule kind.
pub type Finder<T> = fn(&T, <T as QueryTree>::Node, &str) -> Vec<<T as QueryTree>::Node>;

/// Pointwise test of one node for one rule kind.
pub type Matcher<T> = fn(&T, <T as QueryTree>::Node, &str) -> bool;

/// The finder registered for `kind`.
#[must_use]
pub fn finder_for<T: QueryTree>(kind: RuleKind) -> Option<Finder<T>> {
    match kind {
        RuleKind::Id => Some(find_id::<T>),
        RuleKind::NameAndId => Some(find_name_and_id::<T>),
        RuleKind::Element => Some(find_element::<T>),
        RuleKind::Class => Some(find_class::<T>),
        RuleKind::NameAndClass => Some(find_name_and_class::<T>),
        RuleKind::PseudoClass => None,
    }
}

/// The matcher registered for `kind`.
#[must_use]
pub fn matcher_for<T: QueryTree>(kind: RuleKind) -> Option<Matcher<T>> {
    match kind {
        RuleKind::Id => Some(match_id::<T>),
        RuleKind::NameAndId => Some(match_name_and_id::<T>),
        RuleKind::Element => Some(match_element::<T>),
        RuleKind::Class => Some(match_class::<T>),
        RuleKind::NameAndClass => Some(match_name_and_class::<T>),
        RuleKind::PseudoClass => None,
    }
}

/// Run the finder for `token` below `root`.
///
/// # Errors
///
/// Returns [`SelectorError::InvalidFinder`] if no finder is registered for
/// the token's kind.
pub fn find<T: QueryTree>(
    tree: &T,
    root: T::Node,
    token: &Token,
) -> Result<Vec<T::Node>, SelectorError> {
    let finder = finder_for::<T>(token.finder).ok_or(SelectorError::InvalidFinder(token.finder))?;
    Ok(finder(tree, root, &token.identity))
}

/// Run the matcher for `token` against `node`.
///
/// # Errors
///
/// Returns [`SelectorError::InvalidMatcher`] if no matcher is registered for
/// the token's kind.
pub fn matches_token<T: QueryTree>(
    tree: &T,
    node: T::Node,
    token: &Token,
) -> Result<bool, SelectorError> {
    let matcher =
        matcher_for::<T>(token.finder).ok_or(SelectorError::InvalidMatcher(token.finder))?;
    Ok(matcher(tree, node, &token.identity))
}

/// Split `tag#id` / `tag.class` at the first `separator`.
fn split_qualified(selector: &str, separator: char) -> (&str, &str) {
    selector.split_once(separator).unwrap_or((selector, ""))
}

// Finders

fn find_id<T: QueryTree>(tree: &T, root: T::Node, selector: &str) -> Vec<T::Node> {
    let (_, id) = split_qualified(selector, '#');
    tree.element_by_id(root, id).into_iter().collect()
}

fn find_name_and_id<T: QueryTree>(tree: &T, root: T::Node, selector: &str) -> Vec<T::Node> {
    let (name, _) = split_qualified(selector, '#');
    find_id(tree, root, selector)
        .into_iter()
        .filter(|&node| match_element(tree, node, name))
        .collect()
}

fn find_element<T: QueryTree>(tree: &T, root: T::Node, selector: &str) -> Vec<T::Node> {
    tree.elements_by_tag_name(root, selector)
}

fn find_class<T: QueryTree>(tree: &T, root: T::Node, selector: &str) -> Vec<T::Node> {
    let (_, class) = split_qualified(selector, '.');
    tree.elements_by_class_name(root, class)
}

fn find_name_and_class<T: QueryTree>(tree: &T, root: T::Node, selector: &str) -> Vec<T::Node> {
    let (name, _) = split_qualified(selector, '.');
    find_class(tree, root, selector)
        .into_iter()
        .filter(|&node| match_element(tree, node, name))
        .collect()
}

// Matchers

fn match_id<T: QueryTree>(tree: &T, node: T::Node, selector: &str) -> bool {
    let (_, id) = split_qualified(selector, '#');
    tree.id(node) == Some(id)
}

fn match_element<T: QueryTree>(tree: &T, node: T::Node, name: &str) -> bool {
    tree.tag_name(node)
        .is_some_and(|tag| tag.eq_ignore_ascii_case(name))
}

fn match_name_and_id<T: QueryTree>(tree: &T, node: T::Node, selector: &str) -> bool {
    let (name, _) = split_qualified(selector, '#');
    match_id(tree, node, selector) && match_element(tree, node, name)
}

fn match_class<T: QueryTree>(tree: &T, node: T::Node, selector: &str) -> bool {
    let (_, class) = split_qualified(selector, '.');
    tree.has_class(node, class)
}

fn match_name_and_class<T: QueryTree>(tree: &T, node: T::Node, selector: &str) -> bool {
    let (name, _) = split_qualified(selector, '.');
    match_class(tree, node, selector) && match_element(tree, node, name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sieve_dom::{DomTree, ElementData, NodeId, NodeType};

    fn tree_with(elements: &[(&str, Option<&str>, Option<&str>)]) -> (DomTree, Vec<NodeId>) {
        let mut tree = DomTree::new();
        let mut ids = Vec::new();
        for &(tag, id, class) in elements {
            let mut data = ElementData::new(tag);
            if let Some(id) = id {
                data.set_attr("id", id);
            }
            if let Some(class) = class {
                data.set_attr("class", class);
            }
            let node = tree.alloc(NodeType::Element(data));
            tree.append_child(NodeId::ROOT, node);
            ids.push(node);
        }
        (tree, ids)
    }

    #[test]
    fn test_every_kind_but_pseudo_class_is_registered() {
        for kind in RuleKind::PRIORITY {
            let registered = kind != RuleKind::PseudoClass;
            assert_eq!(finder_for::<DomTree>(kind).is_some(), registered, "{kind}");
            assert_eq!(matcher_for::<DomTree>(kind).is_some(), registered, "{kind}");
        }
    }

    #[test]
    fn test_pseudo_class_dispatch_fails() {
        let (tree, ids) = tree_with(&[("a", None, None)]);
        let token = Token::new(":hover", RuleKind::PseudoClass);
        assert_eq!(
            find(&tree, NodeId::ROOT, &token),
            Err(SelectorError::InvalidFinder(RuleKind::PseudoClass))
        );
        assert_eq!(
            matches_token(&tree, ids[0], &token),
            Err(SelectorError::InvalidMatcher(RuleKind::PseudoClass))
        );
    }

    #[test]
    fn test_name_and_id_filters_by_tag() {
        let (tree, ids) = tree_with(&[("span", Some("x"), None)]);
        let div_x = Token::new("div#x", RuleKind::NameAndId);
        let span_x = Token::new("SPAN#x", RuleKind::NameAndId);
        assert!(find(&tree, NodeId::ROOT, &div_x).unwrap().is_empty());
        assert_eq!(find(&tree, NodeId::ROOT, &span_x).unwrap(), vec![ids[0]]);
        assert!(matches_token(&tree, ids[0], &span_x).unwrap());
        assert!(!matches_token(&tree, ids[0], &div_x).unwrap());
    }

    #[test]
    fn test_name_and_class_filters_by_tag() {
        let (tree, ids) = tree_with(&[
            ("div", None, Some("item")),
            ("p", None, Some("item")),
            ("div", None, Some("other")),
        ]);
        let token = Token::new("div.item", RuleKind::NameAndClass);
        assert_eq!(find(&tree, NodeId::ROOT, &token).unwrap(), vec![ids[0]]);
        assert!(!matches_token(&tree, ids[1], &token).unwrap());
    }

    #[test]
    fn test_matchers_reject_document_node() {
        let (tree, _) = tree_with(&[]);
        for token in [
            Token::new("#a", RuleKind::Id),
            Token::new("div", RuleKind::Element),
            Token::new(".a", RuleKind::Class),
        ] {
            assert!(!matches_token(&tree, NodeId::ROOT, &token).unwrap());
        }
    }
}
