//! Native values to representation graphs.

use crate::error::Error;
use crate::event::{CollectionStyle, ScalarStyle};
use crate::location::Location;
use crate::mapper::Represented;
use crate::node::{Document, DocumentBuilder, Mapping, Node, NodeId, NodeKind, Scalar, Sequence};
use crate::path::{NodePath, NodePathSegment, display_path};
use crate::schema::Schema;
use crate::value::Value;

/// Represent `native` as a document, letting `schema` pick the tag of every node.
///
/// Scalars are created plain and collections with [`CollectionStyle::Any`];
/// the serializer decides the final style.
pub fn represent(native: &Value, schema: &dyn Schema) -> Result<Document, Error> {
    let mut representer = Representer {
        schema,
        builder: DocumentBuilder::new(),
        path: NodePath::new(),
    };
    let root = representer.represent(native)?;
    Ok(representer.builder.finish(root))
}

struct Representer<'s> {
    schema: &'s dyn Schema,
    builder: DocumentBuilder,
    path: NodePath,
}

impl Representer<'_> {
    fn represent(&mut self, native: &Value) -> Result<NodeId, Error> {
        let schema = self.schema;
        let mapper = schema.resolve_child_mapper(native, self.path.as_slice())?;
        let content = mapper.represent(native).ok_or_else(|| {
            Error::unrepresentable(
                format!("a {} value as `{}`", native.kind(), mapper.tag()),
                display_path(self.path.as_slice()),
            )
        })?;
        let tag = mapper.tag().clone();
        match content {
            Represented::Scalar(value) => Ok(self.builder.push(Node {
                tag,
                anchor: None,
                location: Location::UNKNOWN,
                kind: NodeKind::Scalar(Scalar {
                    value,
                    style: ScalarStyle::Plain,
                }),
            })),
            Represented::Sequence(items) => {
                let id = self.builder.push(Node {
                    tag,
                    anchor: None,
                    location: Location::UNKNOWN,
                    kind: NodeKind::Sequence(Sequence {
                        items: Vec::with_capacity(items.len()),
                        style: CollectionStyle::Any,
                    }),
                });
                for (index, item) in items.iter().enumerate() {
                    self.path.push(NodePathSegment::SequenceItem { index });
                    let child = self.represent(item);
                    self.path.pop();
                    self.builder.push_item(id, child?);
                }
                Ok(id)
            }
            Represented::Mapping(entries) => {
                let id = self.builder.push(Node {
                    tag,
                    anchor: None,
                    location: Location::UNKNOWN,
                    kind: NodeKind::Mapping(Mapping {
                        entries: Vec::with_capacity(entries.len()),
                        style: CollectionStyle::Any,
                    }),
                });
                for (key, value) in entries {
                    self.path.push(NodePathSegment::MappingKey);
                    let key_id = self.represent(key);
                    self.path.pop();
                    let key_id = key_id?;

                    let key_text = self.builder.node(key_id).and_then(|node| match &node.kind {
                        NodeKind::Scalar(s) => Some(s.value.clone()),
                        _ => None,
                    });
                    self.path.push(NodePathSegment::MappingValue { key: key_text });
                    let value_id = self.represent(value);
                    self.path.pop();
                    self.builder.push_entry(id, key_id, value_id?);
                }
                Ok(id)
            }
        }
    }
}
