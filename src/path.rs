//! Paths from the document root to the node being resolved.

use std::fmt;

use smallvec::SmallVec;

/// One step from a parent collection into a child node.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodePathSegment {
    /// The child is the key of a mapping entry.
    MappingKey,
    /// The child is the value of a mapping entry. `key` holds the key's text when
    /// the key is a scalar, `None` for complex (collection) keys.
    MappingValue { key: Option<String> },
    /// The child is the element at `index` of a sequence.
    SequenceItem { index: usize },
}

/// Ordered segments from the root (first) to the current node (last).
///
/// Resolvers receive this as a plain slice; the stack itself lives only while a
/// document is being walked.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodePath {
    segments: SmallVec<[NodePathSegment; 8]>,
}

impl NodePath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, segment: NodePathSegment) {
        self.segments.push(segment);
    }

    pub fn pop(&mut self) -> Option<NodePathSegment> {
        self.segments.pop()
    }

    pub fn as_slice(&self) -> &[NodePathSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Render a path as `$.key[2].?` for diagnostics.
pub fn display_path(path: &[NodePathSegment]) -> String {
    let mut out = String::from("$");
    for segment in path {
        match segment {
            NodePathSegment::MappingKey => out.push_str(".?"),
            NodePathSegment::MappingValue { key: Some(key) } => {
                out.push('.');
                out.push_str(key);
            }
            NodePathSegment::MappingValue { key: None } => out.push_str(".<complex>"),
            NodePathSegment::SequenceItem { index } => {
                out.push('[');
                out.push_str(&index.to_string());
                out.push(']');
            }
        }
    }
    out
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&display_path(self.as_slice()))
    }
}
