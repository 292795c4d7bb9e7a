//! Build a [`DomTree`] from a JSON description.
//!
//! A document is either a single node or an array of nodes, each appended
//! under the Document root. A node is one of:
//!
//! ```json
//! { "tag": "ul", "attrs": { "id": "menu", "class": "nav" }, "children": [ ... ] }
//! { "text": "Hello" }
//! { "comment": "ignored by text_content" }
//! ```

use std::collections::{BTreeMap, HashSet};

use serde::Deserialize;
use sieve_common::warning::warn_once;
use thiserror::Error;

use crate::{DomTree, ElementData, NodeId, NodeType};

/// Errors produced while loading a JSON document.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The input was not valid JSON or did not have the node shape.
    #[error("malformed document: {0}")]
    Json(#[from] serde_json::Error),

    /// A node object had none of `tag`, `text` or `comment`.
    #[error("node at {path} has no \"tag\", \"text\" or \"comment\"")]
    MissingTag {
        /// Slash-separated child indices leading to the node, e.g. `/0/2`.
        path: String,
    },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DocumentDescription {
    Nodes(Vec<NodeDescription>),
    Node(NodeDescription),
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct NodeDescription {
    tag: Option<String>,
    attrs: BTreeMap<String, String>,
    children: Vec<NodeDescription>,
    text: Option<String>,
    comment: Option<String>,
}

/// Parse `input` into a fresh [`DomTree`].
///
/// Duplicate `id` attributes are accepted (id lookups return the first in
/// tree order) and reported once through the warning system.
///
/// # Errors
///
/// Returns [`LoadError::Json`] for malformed JSON and
/// [`LoadError::MissingTag`] for a node object that is neither an element,
/// a text node nor a comment.
pub fn load_document(input: &str) -> Result<DomTree, LoadError> {
    let description: DocumentDescription = serde_json::from_str(input)?;
    let nodes = match description {
        DocumentDescription::Nodes(nodes) => nodes,
        DocumentDescription::Node(node) => vec![node],
    };

    let mut builder = Builder {
        tree: DomTree::new(),
        seen_ids: HashSet::new(),
    };
    for (index, node) in nodes.into_iter().enumerate() {
        builder.attach(NodeId::ROOT, node, &format!("/{index}"))?;
    }
    Ok(builder.tree)
}

struct Builder {
    tree: DomTree,
    seen_ids: HashSet<String>,
}

impl Builder {
    fn attach(
        &mut self,
        parent: NodeId,
        node: NodeDescription,
        path: &str,
    ) -> Result<(), LoadError> {
        let node_type = if let Some(text) = node.text {
            NodeType::Text(text)
        } else if let Some(comment) = node.comment {
            NodeType::Comment(comment)
        } else if let Some(tag) = node.tag {
            if let Some(id) = node.attrs.get("id")
                && !self.seen_ids.insert(id.clone())
            {
                let _ = warn_once(
                    "DOM",
                    &format!("duplicate id '{id}'; lookups return the first match"),
                );
            }
            NodeType::Element(ElementData {
                tag_name: tag,
                attrs: node.attrs.into_iter().collect(),
            })
        } else {
            return Err(LoadError::MissingTag {
                path: path.to_string(),
            });
        };

        let id = self.tree.alloc(node_type);
        self.tree.append_child(parent, id);

        for (index, child) in node.children.into_iter().enumerate() {
            self.attach(id, child, &format!("{path}/{index}"))?;
        }
        Ok(())
    }
}
