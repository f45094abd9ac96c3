//! Representation graphs back to events.
//!
//! Each node's tag is left implicit when the schema says reading the emitted
//! text back would resolve to the same tag; the schema also picks the style
//! that makes this true. Nodes reachable through more than one edge are
//! anchored on first emission and aliased afterwards.

use tracing::debug;

use crate::event::{AnchorId, CollectionStart, Event, ScalarEvent};
use crate::location::Location;
use crate::node::{Document, NodeId, NodeKind};
use crate::path::{NodePath, NodePathSegment};
use crate::schema::Schema;
use crate::tags::TagName;

impl Document {
    /// Events of a one-document stream, `StreamStart` through `StreamEnd`.
    pub fn to_events(&self, schema: &dyn Schema) -> Vec<Event> {
        let mut serializer = Serializer::new(self, schema);
        serializer.events.push(Event::StreamStart);
        serializer.events.push(Event::DocumentStart {
            location: Location::UNKNOWN,
        });
        serializer.emit(self.root_id());
        serializer.events.push(Event::DocumentEnd {
            location: Location::UNKNOWN,
        });
        serializer.events.push(Event::StreamEnd);
        debug!(
            events = serializer.events.len(),
            anchors = serializer.next_anchor,
            "serialized document"
        );
        serializer.events
    }
}

struct Serializer<'d> {
    doc: &'d Document,
    schema: &'d dyn Schema,
    /// Nodes with more than one incoming edge (the root counts as one).
    shared: Vec<bool>,
    anchors: Vec<Option<AnchorId>>,
    next_anchor: usize,
    path: NodePath,
    events: Vec<Event>,
}

impl<'d> Serializer<'d> {
    fn new(doc: &'d Document, schema: &'d dyn Schema) -> Self {
        let mut references = vec![0usize; doc.len()];
        references[doc.root_id().index()] += 1;
        for node in doc.nodes() {
            for (key, value) in node.entries() {
                references[key.id().index()] += 1;
                references[value.id().index()] += 1;
            }
            for item in node.items() {
                references[item.id().index()] += 1;
            }
        }
        Self {
            doc,
            schema,
            shared: references.into_iter().map(|n| n > 1).collect(),
            anchors: vec![None; doc.len()],
            next_anchor: 0,
            path: NodePath::new(),
            events: Vec::new(),
        }
    }

    fn emit(&mut self, id: NodeId) {
        if let Some(anchor) = self.anchors[id.index()] {
            self.events.push(Event::Alias {
                anchor,
                location: Location::UNKNOWN,
            });
            return;
        }
        let anchor = if self.shared[id.index()] {
            self.next_anchor += 1;
            let anchor = AnchorId(self.next_anchor);
            self.anchors[id.index()] = Some(anchor);
            Some(anchor)
        } else {
            None
        };

        let doc = self.doc;
        let schema = self.schema;
        let node = doc.node(id);
        let path = self.path.as_slice();
        match node.kind() {
            NodeKind::Scalar(scalar) => {
                let implicit = schema.is_tag_implicit_scalar(node.tag(), scalar, path);
                let (tag, style) = match implicit {
                    Some(style) => (TagName::EMPTY, style),
                    None => (node.tag().clone(), scalar.style()),
                };
                self.events.push(Event::Scalar(ScalarEvent {
                    value: scalar.value().to_owned(),
                    style,
                    tag,
                    anchor,
                    location: Location::UNKNOWN,
                }));
            }
            NodeKind::Sequence(sequence) => {
                let implicit = schema.is_tag_implicit_sequence(node.tag(), sequence, path);
                let (tag, style) = match implicit {
                    Some(style) => (TagName::EMPTY, style),
                    None => (node.tag().clone(), sequence.style()),
                };
                self.events.push(Event::SequenceStart(CollectionStart {
                    tag,
                    anchor,
                    style,
                    location: Location::UNKNOWN,
                }));
                for (index, item) in node.items().enumerate() {
                    self.path.push(NodePathSegment::SequenceItem { index });
                    self.emit(item.id());
                    self.path.pop();
                }
                self.events.push(Event::SequenceEnd {
                    location: Location::UNKNOWN,
                });
            }
            NodeKind::Mapping(mapping) => {
                let implicit = schema.is_tag_implicit_mapping(node.tag(), mapping, path);
                let (tag, style) = match implicit {
                    Some(style) => (TagName::EMPTY, style),
                    None => (node.tag().clone(), mapping.style()),
                };
                self.events.push(Event::MappingStart(CollectionStart {
                    tag,
                    anchor,
                    style,
                    location: Location::UNKNOWN,
                }));
                for (key, value) in node.entries() {
                    self.path.push(NodePathSegment::MappingKey);
                    self.emit(key.id());
                    self.path.pop();
                    self.path.push(NodePathSegment::MappingValue {
                        key: key.scalar_value().map(str::to_owned),
                    });
                    self.emit(value.id());
                    self.path.pop();
                }
                self.events.push(Event::MappingEnd {
                    location: Location::UNKNOWN,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::ScalarStyle;
    use crate::represent::represent;
    use crate::schema::CoreSchema;
    use crate::value::Value;

    fn scalars(events: &[Event]) -> Vec<(&str, ScalarStyle, &TagName)> {
        events
            .iter()
            .filter_map(|ev| match ev {
                Event::Scalar(s) => Some((s.value.as_str(), s.style, &s.tag)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn strings_that_look_like_other_types_are_quoted() {
        let value = Value::Sequence(vec![Value::from("true"), Value::Bool(true), Value::from("hi")]);
        let doc = represent(&value, CoreSchema::instance()).unwrap();
        let events = doc.to_events(CoreSchema::instance());
        assert_eq!(
            scalars(&events),
            vec![
                ("true", ScalarStyle::DoubleQuoted, &TagName::EMPTY),
                ("true", ScalarStyle::Plain, &TagName::EMPTY),
                ("hi", ScalarStyle::Plain, &TagName::EMPTY),
            ]
        );
        assert!(matches!(events.first(), Some(Event::StreamStart)));
        assert!(matches!(events.last(), Some(Event::StreamEnd)));
    }
}
