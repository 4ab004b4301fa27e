//! Document tree for timed-text input.
//!
//! This crate provides an arena-based element tree modelled on the
//! [DOM Living Standard](https://dom.spec.whatwg.org/), extended with the
//! XML namespaces that [TTML2](https://www.w3.org/TR/ttml2/) styling relies
//! on.
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all relationships,
//! providing O(1) access and traversal without borrow checker issues. Layout
//! never mutates the tree; collectors and areas refer back to their
//! generating element through a `NodeId`.

mod xml;

pub use xml::{DomError, parse_xml};

/// TTML content namespace (`tt:p`, `tt:span`, `tt:br`).
pub const TT_NAMESPACE: &str = "http://www.w3.org/ns/ttml";

/// TTML styling namespace (`tts:color`, `tts:ruby`, ...).
pub const TTS_NAMESPACE: &str = "http://www.w3.org/ns/ttml#styling";

/// The reserved `xml:` namespace (`xml:lang`, `xml:space`).
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// A type-safe index into the document tree.
///
/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
/// "Each node has an associated node document..."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root document node is always at index 0.
    pub const ROOT: Self = Self(0);
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// "Node is an abstract interface that is used by all nodes in a tree."
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
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// "Each node has an associated node type"
#[derive(Debug, Clone)]
pub enum NodeType {
    /// [§ 4.5 Interface Document](https://dom.spec.whatwg.org/#interface-document)
    Document,
    /// [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element)
    Element(ElementData),
    /// [§ 4.10 Interface Text](https://dom.spec.whatwg.org/#interface-text)
    Text(String),
}

/// [§ 4.9.2 Interface Attr](https://dom.spec.whatwg.org/#interface-attr)
///
/// "Attr nodes are simply known as attributes. ... Attributes have a
/// namespace (null or a non-empty string), ... local name ... value"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// "An attribute's namespace"
    pub namespace: Option<String>,
    /// "An attribute's local name"
    pub local_name: String,
    /// "An attribute's value"
    pub value: String,
}

/// Element-specific data.
///
/// Per [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element):
/// "Elements have an associated namespace, namespace prefix, local name..."
///
/// NOTE: prefixes are not kept; lookups always go through the namespace URI.
#[derive(Debug, Clone, Default)]
pub struct ElementData {
    /// "An element's namespace"
    pub namespace: Option<String>,
    /// "An element's local name"
    pub local_name: String,
    /// "An element has an associated attribute list"
    pub attrs: Vec<Attribute>,
}

impl ElementData {
    /// Create an element in `namespace` with no attributes.
    #[must_use]
    pub fn new(namespace: Option<&str>, local_name: &str) -> Self {
        Self {
            namespace: namespace.map(str::to_string),
            local_name: local_name.to_string(),
            attrs: Vec::new(),
        }
    }

    /// Builder-style attribute setter used when constructing trees by hand.
    #[must_use]
    pub fn with_attribute(mut self, namespace: Option<&str>, local_name: &str, value: &str) -> Self {
        self.set_attribute(namespace, local_name, value);
        self
    }

    /// [§ 4.9](https://dom.spec.whatwg.org/#concept-element-attributes-get-by-namespace)
    ///
    /// "To get an attribute by namespace and local name ... return the first
    /// attribute in element's attribute list whose namespace is namespace and
    /// local name is `localName`, if any; otherwise null."
    #[must_use]
    pub fn attribute(&self, namespace: Option<&str>, local_name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.namespace.as_deref() == namespace && a.local_name == local_name)
            .map(|a| a.value.as_str())
    }

    /// Set (or replace) an attribute value.
    pub fn set_attribute(&mut self, namespace: Option<&str>, local_name: &str, value: &str) {
        if let Some(existing) = self
            .attrs
            .iter_mut()
            .find(|a| a.namespace.as_deref() == namespace && a.local_name == local_name)
        {
            existing.value = value.to_string();
        } else {
            self.attrs.push(Attribute {
                namespace: namespace.map(str::to_string),
                local_name: local_name.to_string(),
                value: value.to_string(),
            });
        }
    }

    /// True when this element is `local_name` in the TTML content namespace.
    ///
    /// Elements without a namespace also match, so hand-built fragments do
    /// not need to carry one.
    #[must_use]
    pub fn is_tt(&self, local_name: &str) -> bool {
        self.local_name == local_name
            && matches!(self.namespace.as_deref(), None | Some(TT_NAMESPACE))
    }
}

/// Arena-based document tree with O(1) node access and traversal.
///
/// [§ 4 Nodes](https://dom.spec.whatwg.org/#nodes)
///
/// "The DOM represents a document as a tree."
#[derive(Debug, Clone)]
pub struct DomTree {
    /// All nodes in the tree, indexed by NodeId.
    /// The Document node is always at index 0 (`NodeId::ROOT`).
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a new tree with just the Document node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                node_type: NodeType::Document,
                parent: None,
                children: Vec::new(),
            }],
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

    /// Get the number of nodes in the tree.
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
        self.nodes.push(Node {
            node_type,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// [§ 4.2.2 Append](https://dom.spec.whatwg.org/#concept-node-append)
    ///
    /// "To append a node to a parent, pre-insert node into parent before null."
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if child.0 >= self.nodes.len() || parent.0 >= self.nodes.len() {
            return;
        }
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Allocate an element and append it to `parent`.
    pub fn append_element(&mut self, parent: NodeId, data: ElementData) -> NodeId {
        let id = self.alloc(NodeType::Element(data));
        self.append_child(parent, id);
        id
    }

    /// Allocate a text node and append it to `parent`.
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        let id = self.alloc(NodeType::Text(text.to_string()));
        self.append_child(parent, id);
        id
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

    /// Children that are elements, in document order.
    pub fn child_elements(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(|&c| self.as_element(c).is_some())
    }

    /// Iterate over all ancestors of a node, from parent to root.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
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
        self.nodes.get_mut(id.0).and_then(|n| match &mut n.node_type {
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

    /// True when `id` is the TTML element `local_name`.
    #[must_use]
    pub fn is_tt_element(&self, id: NodeId, local_name: &str) -> bool {
        self.as_element(id).is_some_and(|e| e.is_tt(local_name))
    }

    /// Attribute value on element `id`.
    #[must_use]
    pub fn attribute(&self, id: NodeId, namespace: Option<&str>, local_name: &str) -> Option<&str> {
        self.as_element(id)
            .and_then(|e| e.attribute(namespace, local_name))
    }

    /// Attribute value on `id` or the nearest ancestor carrying it.
    #[must_use]
    pub fn inherited_attribute(
        &self,
        id: NodeId,
        namespace: Option<&str>,
        local_name: &str,
    ) -> Option<&str> {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .find_map(|n| self.attribute(n, namespace, local_name))
    }

    /// Concatenation of the element's direct text children.
    #[must_use]
    pub fn direct_text(&self, id: NodeId) -> String {
        self.children(id)
            .iter()
            .filter_map(|&c| self.as_text(c))
            .collect()
    }

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-descendant-text-content)
    ///
    /// "The descendant text content of a node node is the concatenation of
    /// the data of all the Text node descendants of node, in tree order."
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        for &child in self.children(id) {
            match self.get(child).map(|n| &n.node_type) {
                Some(NodeType::Text(t)) => out.push_str(t),
                Some(NodeType::Element(_)) => self.collect_text(child, out),
                _ => {}
            }
        }
    }

    /// [§ 3.1.1 The document element](https://dom.spec.whatwg.org/#document-element)
    ///
    /// "The document element of a document is the element whose parent is that
    /// document, if it exists; otherwise null."
    #[must_use]
    pub fn document_element(&self) -> Option<NodeId> {
        self.child_elements(NodeId::ROOT).next()
    }

    /// All TTML elements named `local_name` in document order.
    #[must_use]
    pub fn tt_elements(&self, local_name: &str) -> Vec<NodeId> {
        let mut found = Vec::new();
        self.find_tt(NodeId::ROOT, local_name, &mut found);
        found
    }

    fn find_tt(&self, id: NodeId, local_name: &str, found: &mut Vec<NodeId>) {
        for child in self.child_elements(id) {
            if self.is_tt_element(child, local_name) {
                found.push(child);
            } else {
                self.find_tt(child, local_name, found);
            }
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
