//! The tree interface selector resolution runs against.

use sieve_dom::{DomTree, ElementData, NodeId};

/// Lookup and inspection primitives a host tree provides to the searcher.
///
/// The lookups search the strict descendants of `root` and return nodes in
/// tree order. Non-element nodes answer `None`/`false` to every inspection
/// method, so they never satisfy a matcher.
pub trait QueryTree {
    /// Handle to a node of the tree.
    type Node: Copy + Eq;

    /// First element below `root` whose id is exactly `id`.
    fn element_by_id(&self, root: Self::Node, id: &str) -> Option<Self::Node>;

    /// Elements below `root` whose tag name equals `tag`, ignoring ASCII case.
    fn elements_by_tag_name(&self, root: Self::Node, tag: &str) -> Vec<Self::Node>;

    /// Elements below `root` whose class list contains `class`.
    fn elements_by_class_name(&self, root: Self::Node, class: &str) -> Vec<Self::Node>;

    /// The parent of `node`, or `None` at the top of the tree.
    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    /// The tag name of an element.
    fn tag_name(&self, node: Self::Node) -> Option<&str>;

    /// The id attribute of an element.
    fn id(&self, node: Self::Node) -> Option<&str>;

    /// Whether an element's class list contains `class` as a whole word.
    fn has_class(&self, node: Self::Node, class: &str) -> bool;
}

impl QueryTree for DomTree {
    type Node = NodeId;

    fn element_by_id(&self, root: NodeId, id: &str) -> Option<NodeId> {
        Self::element_by_id(self, root, id)
    }

    fn elements_by_tag_name(&self, root: NodeId, tag: &str) -> Vec<NodeId> {
        Self::elements_by_tag_name(self, root, tag)
    }

    fn elements_by_class_name(&self, root: NodeId, class: &str) -> Vec<NodeId> {
        Self::elements_by_class_name(self, root, class)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        Self::parent(self, node)
    }

    fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.as_element(node).map(|e| e.tag_name.as_str())
    }

    fn id(&self, node: NodeId) -> Option<&str> {
        self.as_element(node).and_then(ElementData::id)
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.as_element(node).is_some_and(|e| e.has_class(class))
    }
}
