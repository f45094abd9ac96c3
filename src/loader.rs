//! Composing parse events into representation graphs.
//!
//! Tags are resolved as nodes are created: explicit specific tags go to
//! [`Schema::resolve_mapper`], everything else to the schema's
//! `resolve_non_specific_*` hooks together with the node's path. A node the
//! schema declines keeps the tag it had in the source.

use std::collections::HashMap;

use nohash_hasher::BuildNoHashHasher;
use tracing::{debug, trace};

use crate::budget::BudgetEnforcer;
use crate::error::{Error, budget_error};
use crate::event::{CollectionStart, Event, ScalarEvent};
use crate::location::Location;
use crate::mapper::MapperKind;
use crate::node::{
    Document, DocumentBuilder, Mapping, Node, NodeId, NodeKind, Scalar, Sequence, Stream,
};
use crate::options::{DuplicateKeyPolicy, Options, UnknownTagPolicy};
use crate::path::{NodePath, NodePathSegment, display_path};
use crate::schema::Schema;
use crate::tags::TagName;

/// Build a [`Stream`] from any event source.
///
/// `select` is called with the index of each document as it starts and returns
/// the schema used for that document.
pub fn load_events<'s, I, F>(events: I, select: F, options: Options) -> Result<Stream, Error>
where
    I: IntoIterator<Item = Result<Event, Error>>,
    F: FnMut(usize) -> &'s dyn Schema,
{
    let mut loader = Loader::new(events.into_iter(), options);
    let result = loader.load_stream(select);
    loader.finish(result)
}

struct Loader<I> {
    events: I,
    options: Options,
    enforcer: Option<BudgetEnforcer>,
    last_location: Location,
}

enum Frame {
    Sequence {
        id: NodeId,
        next_index: usize,
    },
    Mapping {
        id: NodeId,
        pending_key: Option<NodeId>,
        /// Scalar keys seen so far, by (tag, text), with their entry index.
        keys: HashMap<(TagName, String), usize>,
    },
}

/// Per-document composition state.
struct Composer {
    builder: DocumentBuilder,
    anchors: HashMap<usize, NodeId, BuildNoHashHasher<usize>>,
    stack: Vec<Frame>,
    path: NodePath,
    root: Option<NodeId>,
}

impl<I> Loader<I>
where
    I: Iterator<Item = Result<Event, Error>>,
{
    fn new(events: I, options: Options) -> Self {
        let enforcer = options.budget.clone().map(BudgetEnforcer::new);
        Self {
            events,
            options,
            enforcer,
            last_location: Location::UNKNOWN,
        }
    }

    /// Pull the next event through the budget.
    fn next_event(&mut self) -> Result<Option<Event>, Error> {
        let Some(item) = self.events.next() else {
            return Ok(None);
        };
        let ev = item?;
        if ev.location().is_known() {
            self.last_location = ev.location();
        }
        if let Some(enforcer) = self.enforcer.as_mut() {
            if let Err(breach) = enforcer.observe(&ev) {
                if let Some(enforcer) = self.enforcer.take() {
                    let mut report = enforcer.into_report();
                    report.breached = Some(breach.clone());
                    if let Some(callback) = self.options.budget_report {
                        callback(&report);
                    }
                }
                return Err(budget_error(breach).with_location(ev.location()));
            }
        }
        Ok(Some(ev))
    }

    fn finish(mut self, result: Result<Stream, Error>) -> Result<Stream, Error> {
        let stream = result?;
        if let Some(enforcer) = self.enforcer.take() {
            let report = enforcer.finalize();
            if let Some(callback) = self.options.budget_report {
                callback(&report);
            }
            if let Some(breach) = report.breached {
                return Err(budget_error(breach));
            }
        }
        Ok(stream)
    }

    fn load_stream<'s, F>(&mut self, mut select: F) -> Result<Stream, Error>
    where
        F: FnMut(usize) -> &'s dyn Schema,
    {
        let mut documents = Vec::new();
        while let Some(ev) = self.next_event()? {
            match ev {
                Event::StreamStart => {}
                Event::StreamEnd => break,
                Event::DocumentStart { .. } => {
                    let index = documents.len();
                    debug!(index, "composing document");
                    let schema = select(index);
                    documents.push(self.load_document(schema)?);
                }
                other => {
                    return Err(Error::unexpected("document start", other.describe())
                        .with_location(other.location()));
                }
            }
        }
        Ok(Stream { documents })
    }

    fn load_document(&mut self, schema: &dyn Schema) -> Result<Document, Error> {
        let mut doc = Composer::new();
        loop {
            let ev = self
                .next_event()?
                .ok_or_else(|| Error::eof().with_location(self.last_location))?;
            match ev {
                Event::Scalar(scalar) => {
                    let id = self.compose_scalar(&mut doc, schema, scalar)?;
                    doc.attach(id, schema, self.options.duplicate_keys)?;
                }
                Event::Alias { anchor, location } => {
                    let id = doc
                        .anchors
                        .get(&anchor.0)
                        .copied()
                        .ok_or_else(|| Error::unknown_anchor(anchor.0).with_location(location))?;
                    doc.attach(id, schema, self.options.duplicate_keys)?;
                }
                Event::SequenceStart(start) => {
                    let kind = NodeKind::Sequence(Sequence {
                        items: Vec::new(),
                        style: start.style,
                    });
                    self.open_collection(&mut doc, schema, start, kind)?;
                }
                Event::MappingStart(start) => {
                    let kind = NodeKind::Mapping(Mapping {
                        entries: Vec::new(),
                        style: start.style,
                    });
                    self.open_collection(&mut doc, schema, start, kind)?;
                }
                Event::SequenceEnd { location } => {
                    let id = doc.close(MapperKind::Sequence, location)?;
                    doc.attach(id, schema, self.options.duplicate_keys)?;
                }
                Event::MappingEnd { location } => {
                    let id = doc.close(MapperKind::Mapping, location)?;
                    doc.attach(id, schema, self.options.duplicate_keys)?;
                }
                Event::DocumentEnd { location } => {
                    if !doc.stack.is_empty() {
                        return Err(Error::unexpected("collection end", "document end")
                            .with_location(location));
                    }
                    let root = match doc.root {
                        Some(root) => root,
                        None => {
                            let empty = ScalarEvent {
                                location,
                                ..ScalarEvent::plain("")
                            };
                            self.compose_scalar(&mut doc, schema, empty)?
                        }
                    };
                    return Ok(doc.builder.finish(root));
                }
                other => {
                    return Err(Error::unexpected("node or document end", other.describe())
                        .with_location(other.location()));
                }
            }
        }
    }

    fn compose_scalar(
        &self,
        doc: &mut Composer,
        schema: &dyn Schema,
        scalar: ScalarEvent,
    ) -> Result<NodeId, Error> {
        let pushed = doc.enter_child();
        let tag = self.resolve_scalar_tag(schema, &scalar, doc.path.as_slice());
        if pushed {
            doc.path.pop();
        }
        let id = doc.builder.push(Node {
            tag: tag?,
            anchor: scalar.anchor,
            location: scalar.location,
            kind: NodeKind::Scalar(Scalar {
                value: scalar.value,
                style: scalar.style,
            }),
        });
        if let Some(anchor) = scalar.anchor {
            doc.anchors.insert(anchor.0, id);
        }
        Ok(id)
    }

    /// Reserve the collection node before its children so an alias inside it
    /// can refer back to it.
    fn open_collection(
        &self,
        doc: &mut Composer,
        schema: &dyn Schema,
        start: CollectionStart,
        kind: NodeKind,
    ) -> Result<(), Error> {
        doc.enter_child();
        let mapper_kind = match kind {
            NodeKind::Mapping(_) => MapperKind::Mapping,
            _ => MapperKind::Sequence,
        };
        let tag = self.resolve_collection_tag(schema, &start, mapper_kind, doc.path.as_slice())?;
        let id = doc.builder.push(Node {
            tag,
            anchor: start.anchor,
            location: start.location,
            kind,
        });
        if let Some(anchor) = start.anchor {
            doc.anchors.insert(anchor.0, id);
        }
        doc.stack.push(match mapper_kind {
            MapperKind::Mapping => Frame::Mapping {
                id,
                pending_key: None,
                keys: HashMap::new(),
            },
            _ => Frame::Sequence { id, next_index: 0 },
        });
        Ok(())
    }

    fn resolve_scalar_tag(
        &self,
        schema: &dyn Schema,
        scalar: &ScalarEvent,
        path: &[NodePathSegment],
    ) -> Result<TagName, Error> {
        let tag = scalar.effective_tag();
        if tag.is_specific() {
            return self.explicit_tag(schema, tag, MapperKind::Scalar, scalar.location);
        }
        match schema.resolve_non_specific_scalar(scalar, path) {
            Some(mapper) => Ok(mapper.tag().clone()),
            None => {
                trace!(
                    path = %display_path(path),
                    value = %scalar.value,
                    tag = %tag,
                    "schema left scalar unresolved"
                );
                Ok(tag)
            }
        }
    }

    fn resolve_collection_tag(
        &self,
        schema: &dyn Schema,
        start: &CollectionStart,
        kind: MapperKind,
        path: &[NodePathSegment],
    ) -> Result<TagName, Error> {
        if start.tag.is_specific() {
            return self.explicit_tag(schema, start.tag.clone(), kind, start.location);
        }
        let mapper = match kind {
            MapperKind::Mapping => schema.resolve_non_specific_mapping(start, path),
            _ => schema.resolve_non_specific_sequence(start, path),
        };
        match mapper {
            Some(mapper) => Ok(mapper.tag().clone()),
            None => {
                trace!(
                    path = %display_path(path),
                    kind = kind.name(),
                    "schema left collection unresolved"
                );
                Ok(start.tag.clone())
            }
        }
    }

    fn explicit_tag(
        &self,
        schema: &dyn Schema,
        tag: TagName,
        kind: MapperKind,
        location: Location,
    ) -> Result<TagName, Error> {
        match schema.resolve_mapper(&tag) {
            Some(mapper) if mapper.kind() == kind => Ok(mapper.tag().clone()),
            Some(_) => Err(Error::TagKindMismatch {
                tag,
                kind: kind.name(),
                location,
            }),
            None => match self.options.unknown_tags {
                UnknownTagPolicy::Error => Err(Error::unknown_tag(tag).with_location(location)),
                UnknownTagPolicy::Preserve => Ok(tag),
            },
        }
    }
}

impl Composer {
    fn new() -> Self {
        Self {
            builder: DocumentBuilder::new(),
            anchors: HashMap::default(),
            stack: Vec::new(),
            path: NodePath::new(),
            root: None,
        }
    }

    /// Push the path segment of the next child of the innermost collection.
    /// Returns false at the document root, where the path stays empty.
    fn enter_child(&mut self) -> bool {
        let segment = match self.stack.last() {
            None => return false,
            Some(Frame::Sequence { next_index, .. }) => {
                NodePathSegment::SequenceItem { index: *next_index }
            }
            Some(Frame::Mapping {
                pending_key: None, ..
            }) => NodePathSegment::MappingKey,
            Some(Frame::Mapping {
                pending_key: Some(key),
                ..
            }) => NodePathSegment::MappingValue {
                key: self.builder.node(*key).and_then(|node| match &node.kind {
                    NodeKind::Scalar(s) => Some(s.value.clone()),
                    _ => None,
                }),
            },
        };
        self.path.push(segment);
        true
    }

    fn close(&mut self, kind: MapperKind, location: Location) -> Result<NodeId, Error> {
        let found = match kind {
            MapperKind::Mapping => "mapping end",
            _ => "sequence end",
        };
        let id = match (self.stack.pop(), kind) {
            (
                Some(Frame::Mapping {
                    id,
                    pending_key: None,
                    ..
                }),
                MapperKind::Mapping,
            ) => id,
            (Some(Frame::Mapping { .. }), MapperKind::Mapping) => {
                return Err(Error::unexpected("mapping value", found).with_location(location));
            }
            (Some(Frame::Mapping { .. }), _) => {
                return Err(Error::unexpected("mapping end", found).with_location(location));
            }
            (Some(Frame::Sequence { id, .. }), MapperKind::Sequence) => id,
            (Some(Frame::Sequence { .. }), _) => {
                return Err(Error::unexpected("sequence end", found).with_location(location));
            }
            (None, _) => return Err(Error::unexpected("node", found).with_location(location)),
        };
        // The root collection has no segment of its own.
        if !self.stack.is_empty() {
            self.path.pop();
        }
        Ok(id)
    }

    fn attach(
        &mut self,
        id: NodeId,
        schema: &dyn Schema,
        duplicates: DuplicateKeyPolicy,
    ) -> Result<(), Error> {
        let Some(frame) = self.stack.last_mut() else {
            if self.root.is_some() {
                return Err(Error::unexpected("document end", "node"));
            }
            self.root = Some(id);
            return Ok(());
        };
        match frame {
            Frame::Sequence {
                id: sequence,
                next_index,
            } => {
                self.builder.push_item(*sequence, id);
                *next_index += 1;
            }
            Frame::Mapping {
                id: mapping,
                pending_key,
                keys,
            } => match pending_key.take() {
                None => *pending_key = Some(id),
                Some(key) => {
                    insert_entry(&mut self.builder, schema, *mapping, keys, key, id, duplicates)?
                }
            },
        }
        Ok(())
    }
}

/// Key identity within one mapping: the resolved tag plus the text normalized by
/// that tag's mapper, falling back to the source text.
fn key_identity(schema: &dyn Schema, tag: &TagName, text: &str) -> (TagName, String) {
    let canonical = if tag.is_specific() {
        schema
            .resolve_mapper(tag)
            .and_then(|mapper| mapper.canonical_text(text))
    } else {
        None
    };
    (tag.clone(), canonical.unwrap_or_else(|| text.to_owned()))
}

fn insert_entry(
    builder: &mut DocumentBuilder,
    schema: &dyn Schema,
    mapping: NodeId,
    keys: &mut HashMap<(TagName, String), usize>,
    key: NodeId,
    value: NodeId,
    duplicates: DuplicateKeyPolicy,
) -> Result<(), Error> {
    let scalar_key = match builder.node(key) {
        Some(Node {
            tag,
            location,
            kind: NodeKind::Scalar(s),
            ..
        }) => Some((key_identity(schema, tag, &s.value), &s.value, *location)),
        _ => None,
    };
    if let Some((identity, text, location)) = scalar_key {
        if let Some(&index) = keys.get(&identity) {
            match duplicates {
                DuplicateKeyPolicy::Error => {
                    return Err(Error::DuplicateKey {
                        key: text.clone(),
                        location,
                    });
                }
                DuplicateKeyPolicy::FirstWins => return Ok(()),
                DuplicateKeyPolicy::LastWins => {
                    builder.replace_entry(mapping, index, key, value);
                    return Ok(());
                }
                DuplicateKeyPolicy::Keep => {}
            }
        } else {
            keys.insert(identity, builder.entries(mapping).len());
        }
    }
    builder.push_entry(mapping, key, value);
    Ok(())
}
