//! Building native values from a loaded document.

use std::collections::{HashMap, HashSet};

use nohash_hasher::BuildNoHashHasher;

use crate::error::Error;
use crate::node::{Document, NodeKind, NodeRef};
use crate::options::UnknownTagPolicy;
use crate::schema::Schema;
use crate::value::Value;

/// Walks a document and asks the schema's mappers to build native values.
///
/// Nodes that carry an anchor are built once and the result is cloned for every
/// alias. An alias that points back into a node still being built cannot
/// produce a finite value and fails with [`Error::RecursiveAlias`].
pub struct Constructor<'s> {
    schema: &'s dyn Schema,
    unknown_tags: UnknownTagPolicy,
    done: HashMap<usize, Value, BuildNoHashHasher<usize>>,
    in_progress: HashSet<usize, BuildNoHashHasher<usize>>,
}

impl<'s> Constructor<'s> {
    pub fn new(schema: &'s dyn Schema) -> Self {
        Self {
            schema,
            unknown_tags: UnknownTagPolicy::Error,
            done: HashMap::default(),
            in_progress: HashSet::default(),
        }
    }

    /// With [`UnknownTagPolicy::Preserve`], nodes whose tag has no mapper are
    /// built structurally (scalars as strings) instead of failing.
    pub fn with_unknown_tags(mut self, policy: UnknownTagPolicy) -> Self {
        self.unknown_tags = policy;
        self
    }

    pub fn schema(&self) -> &'s dyn Schema {
        self.schema
    }

    pub fn construct(&mut self, node: NodeRef<'_>) -> Result<Value, Error> {
        let key = node.id().index();
        if let Some(value) = self.done.get(&key) {
            return Ok(value.clone());
        }
        if !self.in_progress.insert(key) {
            return Err(Error::RecursiveAlias {
                location: node.location(),
            });
        }
        let result = self.construct_uncached(node);
        self.in_progress.remove(&key);
        let value = result?;
        if node.anchor().is_some() {
            self.done.insert(key, value.clone());
        }
        Ok(value)
    }

    fn construct_uncached(&mut self, node: NodeRef<'_>) -> Result<Value, Error> {
        let schema = self.schema;
        let tag = node.tag();
        if tag.is_specific() {
            match schema.resolve_mapper(tag) {
                Some(mapper) => return mapper.construct(node, self),
                None if self.unknown_tags == UnknownTagPolicy::Error => {
                    return Err(Error::unknown_tag(tag.clone()).with_location(node.location()));
                }
                None => {}
            }
        }
        // Unresolved node: keep the structure, scalars stay text.
        match node.kind() {
            NodeKind::Scalar(scalar) => Ok(Value::String(scalar.value().to_owned())),
            NodeKind::Sequence(_) => {
                let items = node
                    .items()
                    .map(|item| self.construct(item))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::Sequence(items))
            }
            NodeKind::Mapping(_) => {
                let mut entries = Vec::new();
                for (k, v) in node.entries() {
                    entries.push((self.construct(k)?, self.construct(v)?));
                }
                Ok(Value::Mapping(entries))
            }
        }
    }
}

impl Document {
    /// Native value of the root node under `schema`.
    pub fn construct(&self, schema: &dyn Schema) -> Result<Value, Error> {
        Constructor::new(schema).construct(self.root())
    }
}

impl NodeRef<'_> {
    /// Native value of this node under `schema`.
    pub fn to_value(&self, schema: &dyn Schema) -> Result<Value, Error> {
        Constructor::new(schema).construct(*self)
    }
}
