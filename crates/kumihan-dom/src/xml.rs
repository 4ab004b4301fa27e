//! Loading a [`DomTree`] from XML source text.

use thiserror::Error;

use crate::{Attribute, DomTree, ElementData, NodeId, NodeType};

/// Errors raised while building a tree from XML.
#[derive(Debug, Error)]
pub enum DomError {
    /// The source is not well-formed XML.
    #[error("malformed XML: {0}")]
    Malformed(#[from] roxmltree::Error),
}

/// Parse `source` into a [`DomTree`].
///
/// Elements keep their namespace URI and local name, attributes keep their
/// namespace, and text nodes are copied verbatim. Comments and processing
/// instructions are dropped.
///
/// # Errors
///
/// Returns [`DomError::Malformed`] when `source` is not well-formed.
pub fn parse_xml(source: &str) -> Result<DomTree, DomError> {
    let document = roxmltree::Document::parse(source)?;
    let mut tree = DomTree::new();
    copy_children(document.root(), NodeId::ROOT, &mut tree);
    Ok(tree)
}

fn copy_children(from: roxmltree::Node<'_, '_>, to: NodeId, tree: &mut DomTree) {
    for child in from.children() {
        if child.is_element() {
            let tag = child.tag_name();
            let data = ElementData {
                namespace: tag.namespace().map(str::to_string),
                local_name: tag.name().to_string(),
                attrs: child
                    .attributes()
                    .map(|a| Attribute {
                        namespace: a.namespace().map(str::to_string),
                        local_name: a.name().to_string(),
                        value: a.value().to_string(),
                    })
                    .collect(),
            };
            let id = tree.alloc(NodeType::Element(data));
            tree.append_child(to, id);
            copy_children(child, id, tree);
        } else if child.is_text() {
            if let Some(text) = child.text() {
                let _ = tree.append_text(to, text);
            }
        }
    }
}
