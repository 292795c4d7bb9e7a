//! Chainable query results over a [`DomTree`].
//!
//! A [`Selection`] is an ordered list of nodes plus the selector that
//! produced it. Reads take the tree by shared reference; writes take it by
//! mutable reference and return the selection so calls can be chained.

use sieve_dom::{DomTree, NodeId};

use crate::error::SelectorError;
use crate::select;

/// The nodes matched by a selector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    selector: Option<String>,
    nodes: Vec<NodeId>,
}

impl Selection {
    /// Resolve `selector` against the whole document.
    ///
    /// # Errors
    ///
    /// Propagates resolution errors from [`select`].
    pub fn select(tree: &DomTree, selector: &str) -> Result<Self, SelectorError> {
        Ok(Self {
            selector: Some(selector.to_string()),
            nodes: select(tree, tree.root(), selector)?,
        })
    }

    /// Wrap nodes that were obtained some other way.
    #[must_use]
    pub const fn from_nodes(nodes: Vec<NodeId>) -> Self {
        Self {
            selector: None,
            nodes,
        }
    }

    /// Resolve `selector` below the first node of this selection. An empty
    /// selection stays empty.
    ///
    /// # Errors
    ///
    /// Propagates resolution errors from [`select`].
    pub fn find(&self, tree: &DomTree, selector: &str) -> Result<Self, SelectorError> {
        let nodes = match self.nodes.first() {
            Some(&root) => select(tree, root, selector)?,
            None => Vec::new(),
        };
        Ok(Self {
            selector: Some(selector.to_string()),
            nodes,
        })
    }

    /// A selection holding at most the first node.
    #[must_use]
    pub fn first(&self) -> Self {
        Self {
            selector: self.selector.clone(),
            nodes: self.nodes.first().copied().into_iter().collect(),
        }
    }

    /// The selector that produced this selection, if any.
    #[must_use]
    pub fn selector(&self) -> Option<&str> {
        self.selector.as_deref()
    }

    /// The selected nodes in order.
    #[must_use]
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// The node at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<NodeId> {
        self.nodes.get(index).copied()
    }

    /// Number of selected nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether nothing was selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over the selected nodes.
    pub fn iter(&self) -> std::iter::Copied<std::slice::Iter<'_, NodeId>> {
        self.nodes.iter().copied()
    }

    /// Concatenated text of every selected node, or `None` when empty.
    #[must_use]
    pub fn text(&self, tree: &DomTree) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        Some(self.iter().map(|node| tree.text_content(node)).collect())
    }

    /// Replace the children of every selected node with one text node.
    pub fn set_text(&self, tree: &mut DomTree, text: &str) -> &Self {
        for node in self {
            tree.set_text(node, text);
        }
        self
    }

    /// Detach the children of every selected node.
    pub fn empty(&self, tree: &mut DomTree) -> &Self {
        for node in self {
            tree.empty(node);
        }
        self
    }

    /// Whether any selected element has `class`.
    #[must_use]
    pub fn has_class(&self, tree: &DomTree, class: &str) -> bool {
        self.iter()
            .any(|node| tree.as_element(node).is_some_and(|e| e.has_class(class)))
    }

    /// Add `class` to every selected element.
    pub fn add_class(&self, tree: &mut DomTree, class: &str) -> &Self {
        for node in self {
            if let Some(element) = tree.as_element_mut(node) {
                element.add_class(class);
            }
        }
        self
    }

    /// Remove `class` from every selected element.
    pub fn remove_class(&self, tree: &mut DomTree, class: &str) -> &Self {
        for node in self {
            if let Some(element) = tree.as_element_mut(node) {
                element.remove_class(class);
            }
        }
        self
    }

    /// An attribute of the first selected element.
    #[must_use]
    pub fn attr<'t>(&self, tree: &'t DomTree, name: &str) -> Option<&'t str> {
        let first = self.nodes.first()?;
        tree.as_element(*first)?.attr(name)
    }

    /// Set an attribute on the first selected element.
    pub fn set_attr(&self, tree: &mut DomTree, name: &str, value: &str) -> &Self {
        if let Some(element) = self.first_element_mut(tree) {
            element.set_attr(name, value);
        }
        self
    }

    /// Remove an attribute from the first selected element.
    pub fn remove_attr(&self, tree: &mut DomTree, name: &str) -> &Self {
        if let Some(element) = self.first_element_mut(tree) {
            let _ = element.remove_attr(name);
        }
        self
    }

    fn first_element_mut<'t>(
        &self,
        tree: &'t mut DomTree,
    ) -> Option<&'t mut sieve_dom::ElementData> {
        let first = self.nodes.first()?;
        tree.as_element_mut(*first)
    }
}

impl<'a> IntoIterator for &'a Selection {
    type Item = NodeId;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, NodeId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
