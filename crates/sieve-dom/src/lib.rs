//! Document tree for the Sieve selector engine.
//!
//! This crate provides an arena-based tree structure following the
//! [DOM Living Standard](https://dom.spec.whatwg.org/), together with the
//! lookup primitives a selector engine needs (by id, by tag name, by class
//! name) and the handful of mutation helpers a query result operates on.
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all relationships,
//! providing O(1) access and traversal without borrow checker issues.

use std::collections::{HashMap, HashSet};

/// JSON document loading.
pub mod json;

pub use json::{LoadError, load_document};

/// Map of attribute names to values for an element.
pub type AttributesMap = HashMap<String, String>;

/// A type-safe index into the tree.
///
/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
/// "Each node has an associated node document..."
///
/// `NodeId` provides O(1) access to any node in the tree without borrowing issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root document node is always at index 0.
    pub const ROOT: Self = Self(0);
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// "Node is an abstract interface that is used by all nodes in a tree."
///
/// This node stores indices for parent/child/sibling relationships,
/// enabling O(1) traversal in any direction.
#[derive(Debug, Clone)]
pub struct Node {
    /// "Each node has an associated node type"
    pub node_type: NodeType,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-parent)
    /// "An object that participates in a tree has a parent, which is either
    /// null or an object."
    pub parent: Option<NodeId>,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-child)
    /// "A node has an associated list of children"
    pub children: Vec<NodeId>,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-next-sibling)
    pub next_sibling: Option<NodeId>,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-previous-sibling)
    pub prev_sibling: Option<NodeId>,
}

impl Node {
    const fn detached(node_type: NodeType) -> Self {
        Self {
            node_type,
            parent: None,
            children: Vec::new(),
            next_sibling: None,
            prev_sibling: None,
        }
    }
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// "Each node has an associated node type"
#[derive(Debug, Clone)]
pub enum NodeType {
    /// [§ 4.5 Interface Document](https://dom.spec.whatwg.org/#interface-document)
    Document,
    /// [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element)
    /// "Element nodes are simply known as elements."
    Element(ElementData),
    /// [§ 4.10 Interface Text](https://dom.spec.whatwg.org/#interface-text)
    Text(String),
    /// [§ 4.7 Interface Comment](https://dom.spec.whatwg.org/#interface-comment)
    Comment(String),
}

/// Element-specific data.
///
/// NOTE: We only store the tag name (local name) and attributes. The `id`
/// and `class` attributes are ordinary entries of `attrs`.
#[derive(Debug, Clone, Default)]
pub struct ElementData {
    /// "An element's local name"
    pub tag_name: String,
    /// "An element has an associated attribute list"
    pub attrs: AttributesMap,
}

impl ElementData {
    /// Create an element with the given tag name and no attributes.
    #[must_use]
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            attrs: AttributesMap::new(),
        }
    }

    /// Returns the element's id attribute value if present.
    ///
    /// Per [§ 3.2.6 Global attributes](https://html.spec.whatwg.org/multipage/dom.html#global-attributes):
    /// "The id attribute specifies its element's unique identifier (ID)."
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    /// Returns the raw class attribute, or `""` when the element has none.
    #[must_use]
    pub fn class_name(&self) -> &str {
        self.attr("class").unwrap_or("")
    }

    /// Returns the set of class names from the class attribute.
    ///
    /// Per [§ 3.2.6 Global attributes](https://html.spec.whatwg.org/multipage/dom.html#global-attributes):
    /// "The class attribute, if specified, must have a value that is a set of
    /// space-separated tokens representing the various classes that the element belongs to."
    #[must_use]
    pub fn classes(&self) -> HashSet<&str> {
        self.class_name().split_ascii_whitespace().collect()
    }

    /// Check whether `class` appears as a whitespace-delimited word of the
    /// class attribute.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.class_name()
            .split_ascii_whitespace()
            .any(|word| word == class)
    }

    /// Append `class` to the class attribute unless it is already present.
    /// An empty name is ignored.
    pub fn add_class(&mut self, class: &str) {
        if class.is_empty() || self.has_class(class) {
            return;
        }
        let updated = match self.attr("class") {
            Some(existing) if !existing.trim().is_empty() => format!("{existing} {class}"),
            _ => class.to_string(),
        };
        self.set_attr("class", updated);
    }

    /// Remove every occurrence of `class` from the class attribute.
    pub fn remove_class(&mut self, class: &str) {
        if class.is_empty() || !self.has_class(class) {
            return;
        }
        let remaining: Vec<&str> = self
            .class_name()
            .split_ascii_whitespace()
            .filter(|&word| word != class)
            .collect();
        let joined = remaining.join(" ");
        self.set_attr("class", joined);
    }

    /// Get an attribute value.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Set an attribute value, replacing any previous value.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let _ = self.attrs.insert(name.to_string(), value.into());
    }

    /// Remove an attribute, returning its previous value.
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        self.attrs.remove(name)
    }
}

/// Arena-based document tree with O(1) node access and traversal.
///
/// [§ 4 Nodes](https://dom.spec.whatwg.org/#nodes)
///
/// "The DOM represents a document as a tree."
///
/// All nodes live in a contiguous vector and refer to each other by index.
/// Detached nodes stay allocated; they are simply unreachable from the root.
#[derive(Debug, Clone)]
pub struct DomTree {
    /// All nodes in the tree, indexed by `NodeId`.
    /// The Document node is always at index 0 (`NodeId::ROOT`).
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a new tree with just the Document node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::detached(NodeType::Document)],
        }
    }

    /// Get the root document node ID.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Get a mutable reference to a node by its ID.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Get the number of allocated nodes (attached or not).
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty (should always have at least the Document).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a new node and return its ID.
    /// The node is not yet attached to the tree.
    pub fn alloc(&mut self, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::detached(node_type));
        id
    }

    /// [§ 4.2.2 Append](https://dom.spec.whatwg.org/#concept-node-append)
    ///
    /// "To append a node to a parent, pre-insert node into parent before null."
    ///
    /// Appends `child` as the last child of `parent`, updating all relationships.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        let prev_last_child = self.nodes[parent.0].children.last().copied();

        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);

        if let Some(prev_id) = prev_last_child {
            self.nodes[prev_id.0].next_sibling = Some(child);
            self.nodes[child.0].prev_sibling = Some(prev_id);
        }
    }

    /// [§ 4.2.3 Remove](https://dom.spec.whatwg.org/#concept-node-remove)
    ///
    /// Detaches `child` from `parent`, relinking its former siblings.
    /// Does nothing if `child` is not a child of `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        let Some(index) = self.nodes[parent.0]
            .children
            .iter()
            .position(|&c| c == child)
        else {
            return;
        };
        let _ = self.nodes[parent.0].children.remove(index);

        let prev = self.nodes[child.0].prev_sibling.take();
        let next = self.nodes[child.0].next_sibling.take();
        if let Some(prev_id) = prev {
            self.nodes[prev_id.0].next_sibling = next;
        }
        if let Some(next_id) = next {
            self.nodes[next_id.0].prev_sibling = prev;
        }
        self.nodes[child.0].parent = None;
    }

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Get the first child of a node.
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.children.first().copied())
    }

    /// Get the last child of a node.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.children.last().copied())
    }

    /// Get the next sibling of a node.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.next_sibling)
    }

    /// Get the previous sibling of a node.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.prev_sibling)
    }

    /// [§ 4.2.6 Descendant](https://dom.spec.whatwg.org/#concept-tree-descendant)
    ///
    /// "An object A is called a descendant of an object B, if either A is a
    /// child of B or A is a child of an object C that is a descendant of B."
    ///
    /// Check if `descendant` is a descendant of `ancestor`.
    #[must_use]
    pub fn is_descendant_of(&self, descendant: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(descendant).any(|id| id == ancestor)
    }

    /// Iterate over all ancestors of a node, from parent to root.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
        }
    }

    /// [§ 4.2 Tree order](https://dom.spec.whatwg.org/#concept-tree-order)
    ///
    /// "Tree order is preorder, depth-first traversal of a tree."
    ///
    /// Iterate over the strict descendants of `id` in tree order.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> DescendantIterator<'_> {
        DescendantIterator {
            tree: self,
            stack: self.children(id).iter().rev().copied().collect(),
        }
    }

    /// Get element data if this node is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Get mutable element data if this node is an element.
    pub fn as_element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.get_mut(id).and_then(|n| match &mut n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Get text content if this node is a text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// [§ 4.5 getElementById](https://dom.spec.whatwg.org/#dom-nonelementparentnode-getelementbyid)
    ///
    /// "The getElementById(elementId) method steps are to return the first
    /// element, in tree order, within this's descendants, whose ID is elementId."
    #[must_use]
    pub fn element_by_id(&self, root: NodeId, id: &str) -> Option<NodeId> {
        self.descendants(root)
            .find(|&node| self.as_element(node).and_then(ElementData::id) == Some(id))
    }

    /// [§ 4.4 getElementsByTagName](https://dom.spec.whatwg.org/#concept-getelementsbytagname)
    ///
    /// Elements below `root` whose tag name equals `tag`, compared ASCII
    /// case-insensitively, in tree order.
    #[must_use]
    pub fn elements_by_tag_name(&self, root: NodeId, tag: &str) -> Vec<NodeId> {
        self.descendants(root)
            .filter(|&node| {
                self.as_element(node)
                    .is_some_and(|e| e.tag_name.eq_ignore_ascii_case(tag))
            })
            .collect()
    }

    /// [§ 4.4 getElementsByClassName](https://dom.spec.whatwg.org/#concept-getelementsbyclassname)
    ///
    /// Elements below `root` whose class attribute contains `class` as a
    /// whitespace-delimited word, in tree order.
    #[must_use]
    pub fn elements_by_class_name(&self, root: NodeId, class: &str) -> Vec<NodeId> {
        self.descendants(root)
            .filter(|&node| self.as_element(node).is_some_and(|e| e.has_class(class)))
            .collect()
    }

    /// [§ 4.4 textContent](https://dom.spec.whatwg.org/#dom-node-textcontent)
    ///
    /// Concatenated data of every text node in `id`'s subtree. Comments are skipped.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(text) = self.as_text(id) {
            return text.to_string();
        }
        self.descendants(id)
            .filter_map(|node| self.as_text(node))
            .collect()
    }

    /// Replace all children of `id` with a single text node holding `text`.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) {
        self.empty(id);
        let text_node = self.alloc(NodeType::Text(text.into()));
        self.append_child(id, text_node);
    }

    /// Detach every child of `id`.
    pub fn empty(&mut self, id: NodeId) {
        while let Some(child) = self.first_child(id) {
            self.remove_child(id, child);
        }
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over ancestors of a node.
pub struct AncestorIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl Iterator for AncestorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}

/// Pre-order iterator over the strict descendants of a node.
pub struct DescendantIterator<'a> {
    tree: &'a DomTree,
    stack: Vec<NodeId>,
}

impl Iterator for DescendantIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element_with_class(class: &str) -> ElementData {
        let mut data = ElementData::new("div");
        data.set_attr("class", class);
        data
    }

    #[test]
    fn test_has_class_is_word_based() {
        let data = element_with_class("item  item-large\tactive");
        assert!(data.has_class("item"));
        assert!(data.has_class("active"));
        assert!(!data.has_class("large"));
        assert!(!data.has_class("item-"));
    }

    #[test]
    fn test_classes_splits_on_whitespace() {
        let data = element_with_class(" nav\titem nav ");
        assert_eq!(data.classes(), HashSet::from(["nav", "item"]));
        assert!(ElementData::new("p").classes().is_empty());
    }

    #[test]
    fn test_add_class_skips_duplicates_and_empty() {
        let mut data = ElementData::new("p");
        data.add_class("a");
        data.add_class("b");
        data.add_class("a");
        data.add_class("");
        assert_eq!(data.class_name(), "a b");
    }

    #[test]
    fn test_remove_class_removes_every_occurrence() {
        let mut data = element_with_class("a b a c");
        data.remove_class("a");
        assert_eq!(data.class_name(), "b c");
        data.remove_class("missing");
        assert_eq!(data.class_name(), "b c");
    }

    #[test]
    fn test_descendants_are_in_tree_order() {
        let mut tree = DomTree::new();
        let a = tree.alloc(NodeType::Element(ElementData::new("a")));
        let b = tree.alloc(NodeType::Element(ElementData::new("b")));
        let c = tree.alloc(NodeType::Element(ElementData::new("c")));
        let d = tree.alloc(NodeType::Element(ElementData::new("d")));
        tree.append_child(NodeId::ROOT, a);
        tree.append_child(a, b);
        tree.append_child(b, c);
        tree.append_child(NodeId::ROOT, d);

        let order: Vec<NodeId> = tree.descendants(NodeId::ROOT).collect();
        assert_eq!(order, vec![a, b, c, d]);
        assert_eq!(tree.descendants(a).collect::<Vec<_>>(), vec![b, c]);
    }
}
