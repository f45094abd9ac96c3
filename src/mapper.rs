//! Node mappers: the binding between one tag and native values.
//!
//! The core only needs a mapper's tag and its node kind; the conversion itself
//! is delegated to [`NodeMapper::construct`] and [`NodeMapper::represent`].

use std::fmt;

use crate::construct::Constructor;
use crate::error::Error;
use crate::node::{NodeKind, NodeRef};
use crate::tags::TagName;
use crate::value::Value;

/// Which node kind a mapper produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MapperKind {
    Scalar,
    Mapping,
    Sequence,
}

impl MapperKind {
    pub fn name(self) -> &'static str {
        match self {
            MapperKind::Scalar => "scalar",
            MapperKind::Mapping => "mapping",
            MapperKind::Sequence => "sequence",
        }
    }
}

/// Node content produced from a native value. Collections borrow their
/// children so the representer can walk them with their own mappers.
#[derive(Debug, PartialEq)]
pub enum Represented<'v> {
    Scalar(String),
    Sequence(&'v [Value]),
    Mapping(&'v [(Value, Value)]),
}

/// Bidirectional converter bound to exactly one tag.
pub trait NodeMapper: Send + Sync + fmt::Debug {
    fn tag(&self) -> &TagName;

    fn kind(&self) -> MapperKind;

    /// Build the native value of `node`, which carries this mapper's tag.
    /// Children of collections are built through `ctx`.
    fn construct(&self, node: NodeRef<'_>, ctx: &mut Constructor<'_>) -> Result<Value, Error>;

    /// Node content for `native`, or `None` if this mapper cannot represent it.
    fn represent<'v>(&self, native: &'v Value) -> Option<Represented<'v>>;

    /// Normalized spelling of scalar `text` under this tag, so that `0x1` and `1`
    /// compare equal as `int` keys. `None` when the text does not parse.
    fn canonical_text(&self, _text: &str) -> Option<String> {
        None
    }
}

fn kind_mismatch(tag: &TagName, node: NodeRef<'_>) -> Error {
    Error::TagKindMismatch {
        tag: tag.clone(),
        kind: node.kind().name(),
        location: node.location(),
    }
}

/// Mapper for a scalar tag defined by a pair of functions.
pub struct ScalarMapper {
    tag: TagName,
    parse: fn(&str) -> Option<Value>,
    render: fn(&Value) -> Option<String>,
}

impl ScalarMapper {
    /// `parse` turns scalar text into a value (`None` when the text is not
    /// valid for this tag); `render` produces the canonical text of a value.
    pub const fn new(
        tag: TagName,
        parse: fn(&str) -> Option<Value>,
        render: fn(&Value) -> Option<String>,
    ) -> Self {
        Self { tag, parse, render }
    }
}

impl fmt::Debug for ScalarMapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScalarMapper").field("tag", &self.tag).finish()
    }
}

impl NodeMapper for ScalarMapper {
    fn tag(&self) -> &TagName {
        &self.tag
    }

    fn kind(&self) -> MapperKind {
        MapperKind::Scalar
    }

    fn construct(&self, node: NodeRef<'_>, _ctx: &mut Constructor<'_>) -> Result<Value, Error> {
        let text = node
            .scalar_value()
            .ok_or_else(|| kind_mismatch(&self.tag, node))?;
        (self.parse)(text)
            .ok_or_else(|| Error::invalid_scalar(&self.tag, text).with_location(node.location()))
    }

    fn represent<'v>(&self, native: &'v Value) -> Option<Represented<'v>> {
        (self.render)(native).map(Represented::Scalar)
    }

    fn canonical_text(&self, text: &str) -> Option<String> {
        (self.render)(&(self.parse)(text)?)
    }
}

/// Mapper for the structural `map` and `seq` tags.
#[derive(Debug)]
pub struct CollectionMapper {
    tag: TagName,
    kind: MapperKind,
}

impl CollectionMapper {
    pub const fn mapping(tag: TagName) -> Self {
        Self {
            tag,
            kind: MapperKind::Mapping,
        }
    }

    pub const fn sequence(tag: TagName) -> Self {
        Self {
            tag,
            kind: MapperKind::Sequence,
        }
    }
}

impl NodeMapper for CollectionMapper {
    fn tag(&self) -> &TagName {
        &self.tag
    }

    fn kind(&self) -> MapperKind {
        self.kind
    }

    fn construct(&self, node: NodeRef<'_>, ctx: &mut Constructor<'_>) -> Result<Value, Error> {
        match (self.kind, node.kind()) {
            (MapperKind::Mapping, NodeKind::Mapping(_)) => {
                let mut entries = Vec::new();
                for (k, v) in node.entries() {
                    entries.push((ctx.construct(k)?, ctx.construct(v)?));
                }
                Ok(Value::Mapping(entries))
            }
            (MapperKind::Sequence, NodeKind::Sequence(_)) => {
                let items = node
                    .items()
                    .map(|item| ctx.construct(item))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::Sequence(items))
            }
            _ => Err(kind_mismatch(&self.tag, node)),
        }
    }

    fn represent<'v>(&self, native: &'v Value) -> Option<Represented<'v>> {
        match (self.kind, native) {
            (MapperKind::Mapping, Value::Mapping(entries)) => Some(Represented::Mapping(entries)),
            (MapperKind::Sequence, Value::Sequence(items)) => Some(Represented::Sequence(items)),
            _ => None,
        }
    }
}

fn parse_str(s: &str) -> Option<Value> {
    Some(Value::String(s.to_owned()))
}

fn render_str(v: &Value) -> Option<String> {
    v.as_str().map(str::to_owned)
}

/// `tag:yaml.org,2002:str`, shared by every schema.
pub static STR_MAPPER: ScalarMapper = ScalarMapper::new(TagName::STR, parse_str, render_str);
/// `tag:yaml.org,2002:map`, shared by every schema.
pub static MAP_MAPPER: CollectionMapper = CollectionMapper::mapping(TagName::MAP);
/// `tag:yaml.org,2002:seq`, shared by every schema.
pub static SEQ_MAPPER: CollectionMapper = CollectionMapper::sequence(TagName::SEQ);
