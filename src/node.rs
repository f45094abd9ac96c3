//! The representation graph: tag-resolved nodes stored in a per-document arena.
//!
//! Children are referenced by [`NodeId`], so a node reached through several
//! aliases (or through an alias inside itself) is stored once and shared
//! without ownership cycles. Nodes are immutable once the document is built.

use std::fmt;

use crate::event::{AnchorId, CollectionStyle, ScalarStyle};
use crate::location::Location;
use crate::tags::TagName;

/// Handle of a node within its [`Document`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Scalar {
    pub(crate) value: String,
    pub(crate) style: ScalarStyle,
}

impl Scalar {
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn style(&self) -> ScalarStyle {
        self.style
    }
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct Mapping {
    pub(crate) entries: Vec<(NodeId, NodeId)>,
    pub(crate) style: CollectionStyle,
}

impl Mapping {
    /// Key/value pairs in source order.
    pub fn entries(&self) -> &[(NodeId, NodeId)] {
        &self.entries
    }

    pub fn style(&self) -> CollectionStyle {
        self.style
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct Sequence {
    pub(crate) items: Vec<NodeId>,
    pub(crate) style: CollectionStyle,
}

impl Sequence {
    pub fn items(&self) -> &[NodeId] {
        &self.items
    }

    pub fn style(&self) -> CollectionStyle {
        self.style
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    Scalar(Scalar),
    Mapping(Mapping),
    Sequence(Sequence),
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Scalar(_) => "scalar",
            NodeKind::Mapping(_) => "mapping",
            NodeKind::Sequence(_) => "sequence",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub(crate) tag: TagName,
    pub(crate) anchor: Option<AnchorId>,
    pub(crate) location: Location,
    pub(crate) kind: NodeKind,
}

impl Node {
    pub fn tag(&self) -> &TagName {
        &self.tag
    }

    pub fn anchor(&self) -> Option<AnchorId> {
        self.anchor
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }
}

/// One document of a stream: a root node plus the arena that owns its subgraph.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Document {
    pub fn root(&self) -> NodeRef<'_> {
        self.node(self.root)
    }

    pub fn root_id(&self) -> NodeId {
        self.root
    }

    /// Borrow a node of this document.
    ///
    /// # Panics
    /// If `id` was not produced by this document.
    pub fn node(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef { doc: self, id }
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Number of distinct nodes (shared nodes count once).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeRef<'_>> {
        (0..self.nodes.len()).map(move |i| self.node(NodeId(i)))
    }
}

/// Incremental construction of a [`Document`]; used by the loader and the representer.
#[derive(Debug, Default)]
pub(crate) struct DocumentBuilder {
    nodes: Vec<Node>,
}

impl DocumentBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub(crate) fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Append a mapping entry to a mapping reserved earlier.
    pub(crate) fn push_entry(&mut self, mapping: NodeId, key: NodeId, value: NodeId) {
        if let Some(Node {
            kind: NodeKind::Mapping(m),
            ..
        }) = self.nodes.get_mut(mapping.0)
        {
            m.entries.push((key, value));
        }
    }

    pub(crate) fn entries(&self, mapping: NodeId) -> &[(NodeId, NodeId)] {
        match self.nodes.get(mapping.0) {
            Some(Node {
                kind: NodeKind::Mapping(m),
                ..
            }) => &m.entries,
            _ => &[],
        }
    }

    /// Replace the value of entry `index` (last-wins duplicate keys).
    pub(crate) fn replace_entry(&mut self, mapping: NodeId, index: usize, key: NodeId, value: NodeId) {
        if let Some(Node {
            kind: NodeKind::Mapping(m),
            ..
        }) = self.nodes.get_mut(mapping.0)
        {
            if let Some(entry) = m.entries.get_mut(index) {
                *entry = (key, value);
            }
        }
    }

    pub(crate) fn push_item(&mut self, sequence: NodeId, item: NodeId) {
        if let Some(Node {
            kind: NodeKind::Sequence(s),
            ..
        }) = self.nodes.get_mut(sequence.0)
        {
            s.items.push(item);
        }
    }

    pub(crate) fn finish(self, root: NodeId) -> Document {
        Document {
            nodes: self.nodes,
            root,
        }
    }
}

/// A borrowed view of one node together with the document that owns it.
#[derive(Clone, Copy)]
pub struct NodeRef<'d> {
    doc: &'d Document,
    id: NodeId,
}

impl<'d> NodeRef<'d> {
    fn inner(&self) -> &'d Node {
        &self.doc.nodes[self.id.0]
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn document(&self) -> &'d Document {
        self.doc
    }

    pub fn node(&self) -> &'d Node {
        self.inner()
    }

    pub fn tag(&self) -> &'d TagName {
        &self.inner().tag
    }

    pub fn anchor(&self) -> Option<AnchorId> {
        self.inner().anchor
    }

    pub fn location(&self) -> Location {
        self.inner().location
    }

    pub fn kind(&self) -> &'d NodeKind {
        &self.inner().kind
    }

    pub fn as_scalar(&self) -> Option<&'d Scalar> {
        match self.kind() {
            NodeKind::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&'d Mapping> {
        match self.kind() {
            NodeKind::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&'d Sequence> {
        match self.kind() {
            NodeKind::Sequence(s) => Some(s),
            _ => None,
        }
    }

    /// Scalar text as written in the source (not normalized).
    pub fn scalar_value(&self) -> Option<&'d str> {
        self.as_scalar().map(Scalar::value)
    }

    /// Mapping entries as node views, in source order.
    pub fn entries(&self) -> impl Iterator<Item = (NodeRef<'d>, NodeRef<'d>)> + use<'d> {
        let doc = self.doc;
        self.as_mapping()
            .map(|m| m.entries.as_slice())
            .unwrap_or(&[])
            .iter()
            .map(move |&(k, v)| (doc.node(k), doc.node(v)))
    }

    /// Sequence items as node views.
    pub fn items(&self) -> impl Iterator<Item = NodeRef<'d>> + use<'d> {
        let doc = self.doc;
        self.as_sequence()
            .map(|s| s.items.as_slice())
            .unwrap_or(&[])
            .iter()
            .map(move |&id| doc.node(id))
    }

    /// Value of the first entry whose key is a scalar with exactly this text.
    pub fn get(&self, key: &str) -> Option<NodeRef<'d>> {
        self.entries()
            .find(|(k, _)| k.scalar_value() == Some(key))
            .map(|(_, v)| v)
    }

    /// Sequence item at `index`.
    pub fn index(&self, index: usize) -> Option<NodeRef<'d>> {
        let id = *self.as_sequence()?.items.get(index)?;
        Some(self.doc.node(id))
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("node", self.inner())
            .finish()
    }
}

impl fmt::Display for NodeRef<'_> {
    /// One-line summary: tag followed by a compact rendering of the content.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = self.tag();
        match tag.shorthand() {
            Some(short) => write!(f, "{short} ")?,
            None => write!(f, "{tag} ")?,
        }
        match self.kind() {
            NodeKind::Scalar(s) => write!(f, "{:?}", s.value),
            NodeKind::Mapping(m) => write!(f, "{{{} entries}}", m.len()),
            NodeKind::Sequence(s) => write!(f, "[{} items]", s.len()),
        }
    }
}

/// The documents of one YAML stream, in order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Stream {
    pub(crate) documents: Vec<Document>,
}

impl Stream {
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Document at `index` within the stream.
    pub fn get(&self, index: usize) -> Option<&Document> {
        self.documents.get(index)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Document> {
        self.documents.iter()
    }
}

impl IntoIterator for Stream {
    type Item = Document;
    type IntoIter = std::vec::IntoIter<Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.into_iter()
    }
}

impl<'a> IntoIterator for &'a Stream {
    type Item = &'a Document;
    type IntoIter = std::slice::Iter<'a, Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.iter()
    }
}
